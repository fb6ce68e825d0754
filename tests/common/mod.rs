//! Common test utilities shared by the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use tilemapview::chart_spec::{build_chart_spec, ChartSpec};
use tilemapview::normalize::load_dataset;
use tilemapview::{ChartOptions, DataSet};

/// Two North African cells: Libya unknown, Egypt at 2.34.
pub const NORTH_AFRICA_CSV: &str = "\
x,y,value,name,iso-a3
4,1,null,Libya,LBY
5,1,2.34,Egypt,EGY
";

/// One cell per color class plus an unparseable value.
pub const ALL_CLASSES_CSV: &str = "\
x,y,value,name,iso-a3
0,0,null,Unknown Land,UNK
1,0,0.2,Low Land,LOW
2,0,0.5,Half Land,HLF
3,0,1.5,One Land,ONE
4,0,2.9,Two Land,TWO
5,0,3.0,Top Land,TOP
6,0,n/a,Broken Land,BRK
";

/// Load CSV text, panicking on failure.
pub fn load(csv: &str) -> DataSet {
    load_dataset(csv).expect("test CSV loads")
}

/// Chart spec for CSV text with default options.
pub fn spec_for(csv: &str) -> ChartSpec {
    build_chart_spec(&load(csv), &ChartOptions::default())
}

/// Values as they cross the boundary, with the `-999` sentinel.
pub fn boundary_values(data: &DataSet) -> Vec<f64> {
    data.iter().map(|p| p.value.to_f64()).collect()
}
