//! Browser tests for the JS-facing entry points.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const CSV: &str = "x,y,value,name,iso-a3\n4,1,null,Libya,LBY\n5,1,2.34,Egypt,EGY\n";

#[wasm_bindgen_test]
fn parse_keeps_sentinel() {
    let json = tilemapview::parse_tilemap_csv(CSV).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["value"], -999.0);
    assert_eq!(value[1]["name"], "Egypt");
}

#[wasm_bindgen_test]
fn chart_spec_uses_default_options() {
    let json = tilemapview::chart_spec_json(CSV, JsValue::UNDEFINED).unwrap();
    let spec: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(spec["containerId"], "chartIdx1");
}

#[wasm_bindgen_test]
fn missing_column_is_an_error() {
    assert!(tilemapview::chart_spec_json("x,y\n1,2\n", JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn classify_value_labels() {
    assert_eq!(tilemapview::classify_value(-999.0), "Unknown");
    assert_eq!(tilemapview::classify_value(3.5), "Above $3.0 bn");
}
