//! tilemapview - choropleth tile-grid chart for the web
//!
//! Loads a CSV of grid cells (`x`, `y`, `value`, plus free-form fields),
//! classifies each value into one of six fixed color bands and renders the
//! grid with Canvas 2D via WebAssembly:
//! - `-999` and unparseable values show as "Unknown"
//! - construction waits for both the data and the first on-screen moment
//! - responsive layout, hover tooltips, export menu (full screen, PNG, PDF, CSV)
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TileMapWidget } from 'tilemapview';
//! await init();
//! const widget = new TileMapWidget(document.getElementById('app'), {
//!   idx: '1',
//!   title: 'Investments in Africa remain low in most countries',
//!   source: 'UNCTAD',
//! });
//! ```

pub mod chart_spec;
pub mod classes;
pub mod csv;
pub mod error;
pub mod export;
pub mod format;
pub mod layout;
pub mod normalize;
pub mod orchestrator;
pub mod render;
pub mod source;
pub mod telemetry;
pub mod types;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
mod widget;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use widget::TileMapWidget;

pub use chart_spec::{build_chart_spec, ChartSpec};
pub use classes::{classify, ColorClass, DATA_CLASSES};
pub use error::{Result as TileMapResult, TileMapError};
pub use normalize::load_dataset;
pub use orchestrator::{ChartMount, Construction, Orchestrator, Phase};
pub use types::*;

fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse and normalize CSV text and return the data set as JSON.
///
/// Unknown values serialize as `-999`.
///
/// # Errors
/// Returns an error if the CSV has no header or lacks `x`, `y` or `value`.
#[wasm_bindgen]
pub fn parse_tilemap_csv(csv: &str) -> Result<String, JsValue> {
    let data = load_dataset(csv).map_err(to_js_err)?;
    serde_json::to_string(&data.points).map_err(to_js_err)
}

/// Build the full chart description for CSV text and chart options.
///
/// `options` is a `ChartOptions` object; `undefined` selects the defaults.
///
/// # Errors
/// Returns an error if the CSV is unusable or the options are invalid.
#[wasm_bindgen]
pub fn chart_spec_json(csv: &str, options: JsValue) -> Result<String, JsValue> {
    let options: ChartOptions = if options.is_undefined() || options.is_null() {
        ChartOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(to_js_err)?
    };
    options.validate().map_err(to_js_err)?;
    let data = load_dataset(csv).map_err(to_js_err)?;
    serde_json::to_string(&build_chart_spec(&data, &options)).map_err(to_js_err)
}

/// Color class label for a single value.
#[must_use]
#[wasm_bindgen(js_name = classifyValue)]
pub fn classify_value(value: f64) -> String {
    classify(value).to_string()
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
