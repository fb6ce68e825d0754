//! Declarative description of the tile map chart.
//!
//! [`build_chart_spec`] turns a data set and the host's presentation
//! options into a [`ChartSpec`]; [`ChartSpec::resolve`] applies the
//! responsive rules for a container width. Nothing here touches the DOM,
//! so the whole chart configuration is testable natively.

use serde::Serialize;

use crate::classes::{ColorClass, DataClass, DATA_CLASSES};
use crate::export::ExportMenu;
use crate::format::Tooltip;
use crate::types::{ChartOptions, DataSet};

/// Base font for all chart text.
pub const FONT_FAMILY: &str = "Roboto, Arial, sans-serif";
/// Body text color.
pub const TEXT_COLOR: &str = "rgba(0, 0, 0, 0.8)";
/// Title and legend text color.
pub const HEADING_COLOR: &str = "#000000";
/// Tile outline color.
pub const TILE_STROKE: &str = "#cccccc";

/// Delay between the container becoming visible and chart construction.
pub const RENDER_DELAY_MS: u32 = 300;
/// Tile entry animation length.
pub const ANIMATION_MS: u32 = 3000;

const LEGEND_TITLE: &str = "Foreign direct investment\nin Africa, million USD";
const LOGO_SRC: &str = "https://unctad.org/sites/default/files/2022-11/unctad_logo.svg";

/// Shape drawn for each tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileShape {
    Circle,
    Square,
}

/// Legend item flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendLayout {
    Vertical,
    Horizontal,
}

/// Chart height, relative to the width or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartHeight {
    /// Percentage of the container width.
    Percent(f64),
    Pixels(f64),
}

impl ChartHeight {
    pub fn to_px(self, width: f64) -> f64 {
        match self {
            Self::Percent(p) => width * p / 100.0,
            Self::Pixels(px) => px,
        }
    }
}

/// A block of heading text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    pub font_px: f64,
    pub line_height_px: f64,
    pub font_weight: u16,
    pub color: &'static str,
    /// Left offset leaving room for the logo.
    pub x: f64,
}

/// Source and note lines under the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub source: String,
    pub note: String,
}

impl Caption {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Source: {}", self.source)];
        if !self.note.is_empty() {
            lines.push(format!("Note: {}", self.note));
        }
        lines
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub class: ColorClass,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub title: &'static str,
    /// Items in display order (highest class first).
    pub items: Vec<LegendItem>,
    pub layout: LegendLayout,
    pub font_px: f64,
    /// Legend clicks never hide a class.
    pub interactive: bool,
}

/// One tile of the series, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    /// Boundary value (sentinel for unknown).
    pub value: f64,
    pub class: ColorClass,
    pub color: &'static str,
    /// Data label drawn on the tile (`iso-a3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub tooltip_header: String,
    pub tooltip_body: String,
}

/// Overrides applied when the container is at most `max_width` wide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveRule {
    pub max_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<ChartHeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_label_font_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_layout: Option<LegendLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_font_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_line_height_px: Option<f64>,
}

impl ResponsiveRule {
    fn new(max_width: f64) -> Self {
        Self {
            max_width,
            height: None,
            data_label_font_px: None,
            legend_layout: None,
            title_font_px: None,
            title_line_height_px: None,
        }
    }
}

/// Logo drawn in the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoSpec {
    pub src: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Full chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub container_id: String,
    pub title: TextBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<TextBlock>,
    pub caption: Caption,
    pub logo: LogoSpec,
    pub data_classes: Vec<DataClass>,
    pub legend: LegendSpec,
    pub tiles: Vec<TileSpec>,
    pub tile_shape: TileShape,
    pub height: ChartHeight,
    pub data_label_font_px: f64,
    pub animation_ms: u32,
    pub render_delay_ms: u32,
    pub export: ExportMenu,
    pub responsive: Vec<ResponsiveRule>,
}

/// Presentation values after applying the responsive rules for a width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayout {
    pub width: f64,
    pub height: f64,
    pub data_label_font_px: f64,
    pub legend_layout: LegendLayout,
    pub title_font_px: f64,
    pub title_line_height_px: f64,
}

impl ChartSpec {
    /// Apply every rule whose `max_width` admits `width`, in order.
    pub fn resolve(&self, width: f64) -> ResolvedLayout {
        let mut height = self.height;
        let mut resolved = ResolvedLayout {
            width,
            height: 0.0,
            data_label_font_px: self.data_label_font_px,
            legend_layout: self.legend.layout,
            title_font_px: self.title.font_px,
            title_line_height_px: self.title.line_height_px,
        };
        for rule in self.responsive.iter().filter(|r| width <= r.max_width) {
            if let Some(h) = rule.height {
                height = h;
            }
            if let Some(px) = rule.data_label_font_px {
                resolved.data_label_font_px = px;
            }
            if let Some(layout) = rule.legend_layout {
                resolved.legend_layout = layout;
            }
            if let Some(px) = rule.title_font_px {
                resolved.title_font_px = px;
            }
            if let Some(px) = rule.title_line_height_px {
                resolved.title_line_height_px = px;
            }
        }
        resolved.height = height.to_px(width);
        resolved
    }

    /// Tile index whose grid cell is `(x, y)`.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<usize> {
        self.tiles.iter().position(|t| t.x == x && t.y == y)
    }
}

fn responsive_rules() -> Vec<ResponsiveRule> {
    vec![
        ResponsiveRule {
            height: Some(ChartHeight::Percent(150.0)),
            data_label_font_px: Some(14.0),
            ..ResponsiveRule::new(600.0)
        },
        ResponsiveRule {
            height: Some(ChartHeight::Percent(175.0)),
            data_label_font_px: Some(12.0),
            legend_layout: Some(LegendLayout::Horizontal),
            title_font_px: Some(26.0),
            title_line_height_px: Some(30.0),
            ..ResponsiveRule::new(500.0)
        },
        ResponsiveRule {
            height: Some(ChartHeight::Pixels(700.0)),
            data_label_font_px: Some(10.0),
            ..ResponsiveRule::new(400.0)
        },
    ]
}

/// Build the chart configuration for a data set.
///
/// Points without a grid cell get no tile.
pub fn build_chart_spec(data: &DataSet, options: &ChartOptions) -> ChartSpec {
    let tiles = data
        .placed()
        .map(|(x, y, p)| {
            let class = ColorClass::of_value(p.value);
            let tooltip = Tooltip::for_point(p);
            TileSpec {
                x,
                y,
                value: p.value.to_f64(),
                class,
                color: class.color(),
                label: p.label().map(str::to_string),
                tooltip_header: tooltip.header,
                tooltip_body: tooltip.body,
            }
        })
        .collect();

    let legend_items = DATA_CLASSES
        .iter()
        .rev()
        .map(|d| LegendItem {
            class: d.class,
            label: d.name,
            color: d.color,
        })
        .collect();

    ChartSpec {
        container_id: options.container_id(),
        title: TextBlock {
            text: options.title.clone(),
            font_px: 30.0,
            line_height_px: 34.0,
            font_weight: 700,
            color: HEADING_COLOR,
            x: 100.0,
        },
        subtitle: options.subtitle.as_ref().map(|s| TextBlock {
            text: s.clone(),
            font_px: 16.0,
            line_height_px: 18.0,
            font_weight: 400,
            color: TEXT_COLOR,
            x: 100.0,
        }),
        caption: Caption {
            source: options.source.clone(),
            note: options.note.clone(),
        },
        logo: LogoSpec {
            src: LOGO_SRC,
            x: 20.0,
            y: 15.0,
            width: 80.0,
            height: 100.0,
        },
        data_classes: DATA_CLASSES.to_vec(),
        legend: LegendSpec {
            title: LEGEND_TITLE,
            items: legend_items,
            layout: LegendLayout::Vertical,
            font_px: 14.0,
            interactive: false,
        },
        tiles,
        tile_shape: TileShape::Circle,
        height: ChartHeight::Percent(125.0),
        data_label_font_px: 16.0,
        animation_ms: ANIMATION_MS,
        render_delay_ms: RENDER_DELAY_MS,
        export: ExportMenu::default(),
        responsive: responsive_rules(),
    }
}
