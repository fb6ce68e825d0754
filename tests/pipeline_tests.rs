//! End-to-end tests: CSV text through normalization to the chart spec.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use test_case::test_case;
use tilemapview::classes::{classify, ColorClass};
use tilemapview::format::format_tooltip_value;
use tilemapview::normalize::load_dataset;
use tilemapview::render::Frame;
use tilemapview::{TileMapError, Value};

#[test]
fn null_token_scenario() {
    let data = load("x,y,value,name\n0,0,null,Libya\n1,0,2.3,Egypt\n");
    let json = serde_json::to_value(&data.points).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"x": 0, "y": 0, "value": -999.0, "name": "Libya"},
            {"x": 1, "y": 0, "value": 2.3, "name": "Egypt"},
        ])
    );
    let labels: Vec<&str> = data.iter().map(|p| classify(p.value.to_f64())).collect();
    assert_eq!(labels, vec!["Unknown", "$2.0 to $2.9 bn"]);
    assert!(data.defects.is_empty());
}

#[test]
fn large_negative_value_keeps_its_number() {
    let data = load("x,y,value,name\n0,0,-950,A\n");
    assert_eq!(data.points[0].value, Value::Known(-950.0));
    let json = serde_json::to_value(&data.points).unwrap();
    assert_eq!(json[0]["value"], -950.0);

    let spec = spec_for("x,y,value,name\n0,0,-950,A\n");
    assert_eq!(spec.tiles[0].value, -950.0);
    assert_eq!(spec.tiles[0].class, ColorClass::Unknown);
    assert_eq!(spec.tiles[0].tooltip_body, "-950.0 billion USD");
}

#[test]
fn north_africa_scenario() {
    let data = load(NORTH_AFRICA_CSV);
    assert_eq!(boundary_values(&data), vec![-999.0, 2.34]);

    let labels: Vec<&str> = data.iter().map(|p| classify(p.value.to_f64())).collect();
    assert_eq!(labels, vec!["Unknown", "$2.0 to $2.9 bn"]);

    let spec = spec_for(NORTH_AFRICA_CSV);
    assert_eq!(spec.tiles[0].tooltip_header, "Libya");
    assert_eq!(spec.tiles[0].tooltip_body, "Unknown");
    assert_eq!(spec.tiles[0].color, "#ffffff");
    assert_eq!(spec.tiles[1].tooltip_body, "2.3 billion USD");
    assert_eq!(spec.tiles[1].label.as_deref(), Some("EGY"));
    assert_eq!(spec.tiles[1].value, 2.34);
}

#[test_case(2.34, "2.3 billion USD" ; "rounds to one decimal")]
#[test_case(-999.0, "Unknown" ; "sentinel")]
#[test_case(-950.0, "-950.0 billion USD" ; "large negative is real data")]
#[test_case(0.0, "0.0 billion USD" ; "zero")]
#[test_case(1234.56, "1,234.6 billion USD" ; "grouped")]
fn tooltip_text(value: f64, expected: &str) {
    assert_eq!(format_tooltip_value(value), expected);
}

#[test]
fn one_point_per_row_in_order() {
    let data = load(ALL_CLASSES_CSV);
    assert_eq!(data.len(), 7);
    let names: Vec<String> = data.iter().map(|p| p.display_name()).collect();
    assert_eq!(names[0], "Unknown Land");
    assert_eq!(names[6], "Broken Land");
    assert_eq!(data.points[6].value, Value::Unknown);
    assert_eq!(data.defects.len(), 1);
    assert_eq!(data.defects[0].column, "value");
    assert_eq!(data.defects[0].raw, "n/a");
}

#[test]
fn every_class_is_reachable() {
    let spec = spec_for(ALL_CLASSES_CSV);
    let classes: Vec<ColorClass> = spec.tiles.iter().map(|t| t.class).collect();
    assert_eq!(
        classes,
        vec![
            ColorClass::Unknown,
            ColorClass::BelowHalf,
            ColorClass::HalfToOne,
            ColorClass::OneToTwo,
            ColorClass::TwoToThree,
            ColorClass::AboveThree,
            ColorClass::Unknown,
        ]
    );
}

#[test]
fn unparseable_coordinate_keeps_the_row_off_grid() {
    let data = load("x,y,value,name\n?,0,1.2,Nowhere\n1,0,0.7,Somewhere\n");
    assert_eq!(data.len(), 2);
    assert_eq!(data.points[0].cell(), None);
    assert_eq!(data.points[0].value, Value::Known(1.2));
    assert_eq!(data.defects.len(), 1);
    assert_eq!(data.defects[0].column, "x");

    let spec = tilemapview::build_chart_spec(&data, &tilemapview::ChartOptions::default());
    assert_eq!(spec.tiles.len(), 1);
    assert_eq!(spec.tiles[0].tooltip_header, "Somewhere");
}

#[test]
fn header_only_csv_is_an_empty_chart() {
    let data = load("x,y,value\n");
    assert!(data.is_empty());
    let spec = spec_for("x,y,value\n");
    assert!(spec.tiles.is_empty());
    assert_eq!(spec.legend.items.len(), 6);
}

#[test]
fn missing_value_column_is_rejected() {
    let err = load_dataset("x,y,name\n1,2,Foo\n").unwrap_err();
    assert!(matches!(err, TileMapError::MissingColumn(ref c) if c == "value"));
}

#[test]
fn empty_text_is_rejected() {
    assert!(matches!(load_dataset(""), Err(TileMapError::EmptyInput)));
}

#[test]
fn extra_columns_pass_through_to_json() {
    let data = load(NORTH_AFRICA_CSV);
    let json = serde_json::to_value(&data.points).unwrap();
    assert_eq!(json[0]["value"], -999.0);
    assert_eq!(json[0]["name"], "Libya");
    assert_eq!(json[1]["iso-a3"], "EGY");
    assert_eq!(json[1]["x"], 5);
}

#[test]
fn scene_labels_tiles_with_iso_codes() {
    let spec = spec_for(NORTH_AFRICA_CSV);
    let frame = Frame::new(&spec, 800.0);
    let texts: Vec<&str> = frame.scene.texts().collect();
    assert!(texts.contains(&"LBY"));
    assert!(texts.contains(&"EGY"));
    assert!(texts.contains(&"Unknown"));
    assert_eq!(frame.scene.tile_fills(), vec!["#ffffff", "#6dbfa9"]);
}
