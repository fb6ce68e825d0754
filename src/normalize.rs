//! Record normalization: raw CSV strings to typed [`DataPoint`]s.
//!
//! - `value`: the literal `null` and the exact `-999` sentinel mean unknown;
//!   anything else must parse completely as a finite float. Unlike
//!   `parseFloat`, trailing text is not ignored: `"2.3 bn"` is reported as a
//!   [`FieldDefect`] and the point is kept as [`Value::Unknown`], so a unit
//!   or typo in the data never passes silently as a number.
//! - `x` / `y`: parsed like `parseInt(s, 10)` (leading integer prefix, so
//!   `"1.7"` is `1`). A coordinate without digits is reported and left as
//!   `None`; the point is kept but has no grid cell.
//! - Every other column passes through unchanged.

use tracing::{debug, warn};

use crate::csv::{parse_csv, CsvTable};
use crate::error::{Result, TileMapError};
use crate::types::{DataPoint, DataSet, FieldDefect, RawRecord, Value};

/// Token the dataset uses for a missing value.
pub const NULL_TOKEN: &str = "null";

/// Columns every tile-map CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["x", "y", "value"];

/// Result of normalizing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub point: DataPoint,
    pub defects: Vec<FieldDefect>,
}

/// Parse a `value` cell. `Ok(Unknown)` for the null token, `Err(())` for garbage.
pub fn parse_value(raw: &str) -> std::result::Result<Value, ()> {
    let s = raw.trim();
    if s == NULL_TOKEN {
        return Ok(Value::Unknown);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Value::from_f64(v)),
        _ => Err(()),
    }
}

/// Parse a grid coordinate with `parseInt` semantics: optional sign, then the
/// longest run of ASCII digits. Fractions are truncated toward zero.
pub fn parse_coord(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..)?),
        Some(b'+') => (false, s.get(1..)?),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let digits = rest.get(..digits_len)?;
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    i32::try_from(signed).ok()
}

/// Normalize one record. `row` is its zero-based data-row index.
pub fn normalize_record(row: usize, record: &RawRecord) -> Normalized {
    let mut defects = Vec::new();
    let mut fields = record.clone();

    let mut defect = |column: &str, raw: &str| {
        defects.push(FieldDefect {
            row,
            column: column.to_string(),
            raw: raw.to_string(),
        });
    };

    let raw_value = fields.remove("value").unwrap_or_default();
    let value = parse_value(&raw_value).unwrap_or_else(|()| {
        defect("value", &raw_value);
        Value::Unknown
    });

    let raw_x = fields.remove("x").unwrap_or_default();
    let raw_y = fields.remove("y").unwrap_or_default();
    let x = parse_coord(&raw_x);
    if x.is_none() {
        defect("x", &raw_x);
    }
    let y = parse_coord(&raw_y);
    if y.is_none() {
        defect("y", &raw_y);
    }

    Normalized {
        point: DataPoint {
            x,
            y,
            value,
            fields,
        },
        defects,
    }
}

/// Normalize every record in order.
pub fn normalize_records(records: &[RawRecord]) -> DataSet {
    let mut data = DataSet::default();
    for (row, record) in records.iter().enumerate() {
        let Normalized { point, defects } = normalize_record(row, record);
        for d in &defects {
            warn!(row = d.row, column = %d.column, raw = %d.raw, "non-numeric field");
        }
        data.defects.extend(defects);
        data.points.push(point);
    }
    debug!(
        rows = records.len(),
        points = data.points.len(),
        defects = data.defects.len(),
        "normalized records"
    );
    data
}

/// Check that a parsed table carries the tile-map columns.
pub fn check_columns(table: &CsvTable) -> Result<()> {
    if table.headers.is_empty() {
        return Err(TileMapError::EmptyInput);
    }
    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            return Err(TileMapError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Parse and normalize CSV text in one step.
pub fn load_dataset(text: &str) -> Result<DataSet> {
    let table = parse_csv(text);
    check_columns(&table)?;
    Ok(normalize_records(&table.records))
}
