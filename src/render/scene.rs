//! Backend-agnostic drawing list for one chart frame.

use crate::chart_spec::{
    ChartSpec, ResolvedLayout, TileShape, FONT_FAMILY, HEADING_COLOR, TEXT_COLOR, TILE_STROKE,
};
use crate::layout::ChartLayout;

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
        }
    }
}

/// A single drawing operation in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: String,
        stroke: Option<String>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
        stroke: Option<String>,
    },
    Text {
        x: f64,
        /// Baseline is the vertical middle of the text.
        y: f64,
        text: String,
        font: String,
        color: String,
        align: TextAlign,
        max_width: Option<f64>,
    },
    Image {
        src: String,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
}

/// Ordered primitives plus the surface size they were laid out for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// All text strings in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Fill colors of tile shapes in draw order.
    pub fn tile_fills(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle { fill, .. } => Some(fill.as_str()),
                Primitive::Rect {
                    fill,
                    stroke: Some(s),
                    ..
                } if s == TILE_STROKE => Some(fill.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn font(weight: u16, px: f64) -> String {
    format!("{weight} {px}px {FONT_FAMILY}")
}

/// Lay out every element of the chart into a [`Scene`].
pub fn build_scene(spec: &ChartSpec, resolved: &ResolvedLayout, layout: &ChartLayout) -> Scene {
    let mut out = Vec::new();

    out.push(Primitive::Rect {
        x: 0.0,
        y: 0.0,
        w: layout.width,
        h: layout.height,
        fill: "#ffffff".to_string(),
        stroke: None,
    });

    out.push(Primitive::Image {
        src: spec.logo.src.to_string(),
        x: spec.logo.x,
        y: spec.logo.y,
        w: spec.logo.width,
        h: spec.logo.height,
    });

    // Headings
    let heading_width = (layout.width - spec.title.x - 10.0).max(0.0);
    let title_y = 10.0 + resolved.title_line_height_px / 2.0;
    out.push(Primitive::Text {
        x: spec.title.x,
        y: title_y,
        text: spec.title.text.clone(),
        font: font(spec.title.font_weight, resolved.title_font_px),
        color: spec.title.color.to_string(),
        align: TextAlign::Left,
        max_width: Some(heading_width),
    });
    if let Some(sub) = &spec.subtitle {
        out.push(Primitive::Text {
            x: sub.x,
            y: title_y + resolved.title_line_height_px / 2.0 + 8.0 + sub.line_height_px / 2.0,
            text: sub.text.clone(),
            font: font(sub.font_weight, sub.font_px),
            color: sub.color.to_string(),
            align: TextAlign::Left,
            max_width: Some(heading_width),
        });
    }

    // Tiles, then their labels on top.
    for placement in &layout.tiles {
        let Some(tile) = spec.tiles.get(placement.index) else {
            continue;
        };
        let shape = match spec.tile_shape {
            TileShape::Circle => Primitive::Circle {
                cx: placement.cx,
                cy: placement.cy,
                r: placement.radius,
                fill: tile.color.to_string(),
                stroke: Some(TILE_STROKE.to_string()),
            },
            TileShape::Square => Primitive::Rect {
                x: placement.cx - placement.radius,
                y: placement.cy - placement.radius,
                w: placement.radius * 2.0,
                h: placement.radius * 2.0,
                fill: tile.color.to_string(),
                stroke: Some(TILE_STROKE.to_string()),
            },
        };
        out.push(shape);
    }
    for placement in &layout.tiles {
        let Some(label) = spec.tiles.get(placement.index).and_then(|t| t.label.as_ref()) else {
            continue;
        };
        out.push(Primitive::Text {
            x: placement.cx,
            y: placement.cy,
            text: label.clone(),
            font: font(400, resolved.data_label_font_px),
            color: TEXT_COLOR.to_string(),
            align: TextAlign::Center,
            max_width: Some(placement.radius * 2.0),
        });
    }

    // Legend
    let legend_font = font(400, spec.legend.font_px);
    let title_font = font(600, spec.legend.font_px);
    let line_height = spec.legend.font_px * 1.3;
    for (i, line) in spec.legend.title.lines().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let offset = (i as f64 + 0.5) * line_height;
        out.push(Primitive::Text {
            x: layout.plot.x,
            y: layout.legend_title_y + offset,
            text: line.to_string(),
            font: title_font.clone(),
            color: HEADING_COLOR.to_string(),
            align: TextAlign::Left,
            max_width: None,
        });
    }
    for entry in &layout.legend {
        let Some(item) = spec.legend.items.get(entry.index) else {
            continue;
        };
        out.push(Primitive::Rect {
            x: entry.symbol.x,
            y: entry.symbol.y,
            w: entry.symbol.w,
            h: entry.symbol.h,
            fill: item.color.to_string(),
            stroke: Some("#7c7067".to_string()),
        });
        out.push(Primitive::Text {
            x: entry.text_x,
            y: entry.text_y,
            text: item.label.to_string(),
            font: legend_font.clone(),
            color: HEADING_COLOR.to_string(),
            align: TextAlign::Left,
            max_width: None,
        });
    }

    // Caption
    let caption_font = font(400, 14.0);
    for (i, line) in spec.caption.lines().into_iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = layout.caption_y + (i as f64 + 0.5) * 18.0;
        out.push(Primitive::Text {
            x: layout.plot.x,
            y,
            text: line,
            font: caption_font.clone(),
            color: TEXT_COLOR.to_string(),
            align: TextAlign::Left,
            max_width: Some(layout.width),
        });
    }

    Scene {
        width: layout.width,
        height: layout.height,
        primitives: out,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::chart_spec::build_chart_spec;
    use crate::types::{ChartOptions, DataPoint, DataSet, Value};

    fn scene(width: f64) -> Scene {
        let data = DataSet::new(vec![
            DataPoint::new(0, 0, Value::Unknown).with_field("iso-a3", "LBY"),
            DataPoint::new(1, 0, Value::Known(2.3)).with_field("iso-a3", "EGY"),
        ]);
        let spec = build_chart_spec(&data, &ChartOptions::default());
        let resolved = spec.resolve(width);
        let layout = ChartLayout::compute(&spec, &resolved);
        build_scene(&spec, &resolved, &layout)
    }

    #[test]
    fn test_tiles_use_class_colors() {
        let s = scene(800.0);
        assert_eq!(s.tile_fills(), vec!["#ffffff", "#6dbfa9"]);
    }

    #[test]
    fn test_texts_include_headings_labels_legend_and_caption() {
        let s = scene(800.0);
        let texts: Vec<&str> = s.texts().collect();
        assert_eq!(texts[0], "Investments in Africa remain low in most countries");
        assert!(texts.contains(&"LBY"));
        assert!(texts.contains(&"EGY"));
        assert!(texts.contains(&"Above $3.0 bn"));
        assert!(texts.contains(&"Source: UNCTAD"));
        assert!(texts.contains(&"Note: Data for Libya and Ivory Coast is missing"));
    }

    #[test]
    fn test_label_font_follows_breakpoints() {
        let s = scene(350.0);
        let label_font = s.primitives.iter().find_map(|p| match p {
            Primitive::Text { text, font, .. } if text == "EGY" => Some(font.clone()),
            _ => None,
        });
        assert_eq!(label_font.as_deref(), Some("400 10px Roboto, Arial, sans-serif"));
    }
}
