//! Chart configuration: responsive rules, legend, export menu and layout.
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
use tilemapview::chart_spec::{build_chart_spec, LegendLayout, TileShape};
use tilemapview::export::{data_table_csv, export_filename, MenuItem};
use tilemapview::layout::ChartLayout;
use tilemapview::ChartOptions;

#[test_case(1000.0, 1250.0, 16.0, LegendLayout::Vertical, 30.0 ; "wide")]
#[test_case(600.0, 900.0, 14.0, LegendLayout::Vertical, 30.0 ; "at 600")]
#[test_case(480.0, 840.0, 12.0, LegendLayout::Horizontal, 26.0 ; "at 480")]
#[test_case(400.0, 700.0, 10.0, LegendLayout::Horizontal, 26.0 ; "at 400")]
#[test_case(320.0, 700.0, 10.0, LegendLayout::Horizontal, 26.0 ; "narrow")]
fn responsive_rules_stack(
    width: f64,
    height: f64,
    label_px: f64,
    legend: LegendLayout,
    title_px: f64,
) {
    let spec = spec_for(NORTH_AFRICA_CSV);
    let resolved = spec.resolve(width);
    assert_eq!(resolved.height, height);
    assert_eq!(resolved.data_label_font_px, label_px);
    assert_eq!(resolved.legend_layout, legend);
    assert_eq!(resolved.title_font_px, title_px);
}

#[test]
fn defaults_match_the_published_chart() {
    let spec = spec_for(NORTH_AFRICA_CSV);
    assert_eq!(spec.container_id, "chartIdx1");
    assert_eq!(spec.tile_shape, TileShape::Circle);
    assert_eq!(spec.render_delay_ms, 300);
    assert_eq!(spec.animation_ms, 3000);
    assert!(spec.caption.lines()[0].starts_with("Source: UNCTAD"));
    assert!(spec.subtitle.is_some());
}

#[test]
fn legend_lists_highest_class_first() {
    let spec = spec_for(NORTH_AFRICA_CSV);
    let labels: Vec<&str> = spec.legend.items.iter().map(|i| i.label).collect();
    assert_eq!(
        labels,
        vec![
            "Above $3.0 bn",
            "$2.0 to $2.9 bn",
            "$1.0 to $1.9 bn",
            "$0.5 to 1.0 bn",
            "Below $0.5 bn",
            "Unknown",
        ]
    );
    assert!(!spec.legend.interactive);
}

#[test]
fn options_drive_headings() {
    let data = load(NORTH_AFRICA_CSV);
    let options = ChartOptions::new("7", "Flows", "World Bank").with_note("Estimates.");
    let spec = build_chart_spec(&data, &options);
    assert_eq!(spec.container_id, "chartIdx7");
    assert_eq!(spec.title.text, "Flows");
    assert!(spec.subtitle.is_none());
    assert_eq!(
        spec.caption.lines(),
        vec!["Source: World Bank".to_string(), "Note: Estimates.".to_string()]
    );
}

#[test]
fn export_menu_offers_every_download() {
    let spec = spec_for(NORTH_AFRICA_CSV);
    assert!(spec.export.enabled);
    for item in [
        MenuItem::ViewFullscreen,
        MenuItem::DownloadPng,
        MenuItem::DownloadPdf,
        MenuItem::DownloadCsv,
    ] {
        assert!(spec.export.contains(item), "{item:?} missing");
    }
    assert_eq!(spec.export.items.last(), Some(&MenuItem::DownloadCsv));
}

#[test]
fn csv_download_blanks_unknown_values() {
    let data = load(NORTH_AFRICA_CSV);
    let csv = data_table_csv(&data);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("x,y,value,name,iso-a3"));
    assert_eq!(lines.next(), Some("4,1,,Libya,LBY"));
    assert_eq!(lines.next(), Some("5,1,2.34,Egypt,EGY"));
    assert_eq!(
        export_filename("Investments in Africa remain low in most countries", "csv"),
        "investments-in-africa-remain-low-in-most-countries.csv"
    );
}

#[test]
fn layout_keeps_tiles_inside_the_plot() {
    let spec = spec_for(ALL_CLASSES_CSV);
    for width in [320.0, 480.0, 800.0, 1200.0] {
        let layout = ChartLayout::compute(&spec, &spec.resolve(width));
        assert_eq!(layout.tiles.len(), spec.tiles.len());
        for t in &layout.tiles {
            assert!(layout.plot.contains(t.cx, t.cy), "tile outside plot at {width}");
            assert_eq!(layout.hit_test(t.cx, t.cy), Some(t.index));
        }
    }
}

#[test]
fn spec_serializes_to_json() {
    let spec = spec_for(NORTH_AFRICA_CSV);
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["tiles"][0]["value"], -999.0);
    assert_eq!(json["dataClasses"].as_array().map(Vec::len), Some(6));
}
