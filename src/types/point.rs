use serde::ser::{Serialize, SerializeMap, Serializer};

use super::RawRecord;

/// Numeric stand-in for [`Value::Unknown`] at the chart boundary.
pub const UNKNOWN_SENTINEL: f64 = -999.0;

/// Values at or below this fall into the Unknown color class.
pub const UNKNOWN_THRESHOLD: f64 = -900.0;

/// An investment magnitude, or a missing one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Known(f64),
    Unknown,
}

impl Value {
    /// Lift a boundary number back into a `Value`.
    ///
    /// Only the exact sentinel and non-finite numbers map to `Unknown`; other
    /// large negatives stay real data.
    pub fn from_f64(v: f64) -> Self {
        if !v.is_finite() || v.to_bits() == UNKNOWN_SENTINEL.to_bits() {
            Self::Unknown
        } else {
            Self::Known(v)
        }
    }

    /// The number handed to the chart layer; `Unknown` becomes the sentinel.
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Known(v) => v,
            Self::Unknown => UNKNOWN_SENTINEL,
        }
    }

    pub fn known(self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// A normalized tile.
///
/// A coordinate is `None` when its CSV cell held no integer; such a point
/// stays in the data set but has no grid cell and is not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Horizontal grid coordinate.
    pub x: Option<i32>,
    /// Vertical grid coordinate.
    pub y: Option<i32>,
    pub value: Value,
    /// Pass-through columns (name, iso-a3, ...) in header order.
    pub fields: RawRecord,
}

impl DataPoint {
    pub fn new(x: i32, y: i32, value: Value) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            value,
            fields: RawRecord::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key, value);
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// Grid cell `(x, y)`, if both coordinates parsed.
    pub fn cell(&self) -> Option<(i32, i32)> {
        Some((self.x?, self.y?))
    }

    /// Display name for tooltips; falls back to the iso code, then the grid cell.
    pub fn display_name(&self) -> String {
        self.field("name")
            .or_else(|| self.field("iso-a3"))
            .map(str::to_string)
            .unwrap_or_else(|| match self.cell() {
                Some((x, y)) => format!("({x}, {y})"),
                None => "(?, ?)".to_string(),
            })
    }

    /// Short tile label (the `iso-a3` column).
    pub fn label(&self) -> Option<&str> {
        self.field("iso-a3")
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("x", &self.x)?;
        map.serialize_entry("y", &self.y)?;
        map.serialize_entry("value", &self.value.to_f64())?;
        for (k, v) in self.fields.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A field that failed numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldDefect {
    /// Zero-based data row (header excluded).
    pub row: usize,
    pub column: String,
    pub raw: String,
}

impl std::fmt::Display for FieldDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {}: column `{}` is not numeric ({:?})",
            self.row, self.column, self.raw
        )
    }
}

/// Normalized rows in CSV order plus any parse defects.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DataSet {
    pub points: Vec<DataPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<FieldDefect>,
}

impl DataSet {
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self {
            points,
            defects: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint> {
        self.points.iter()
    }

    /// Points that have a grid cell, with that cell.
    pub fn placed(&self) -> impl Iterator<Item = (i32, i32, &DataPoint)> {
        self.points
            .iter()
            .filter_map(|p| p.cell().map(|(x, y)| (x, y, p)))
    }

    /// Inclusive grid extent `(min_x, min_y, max_x, max_y)` of placed points.
    pub fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let mut cells = self.placed();
        let (x, y, _) = cells.next()?;
        Some(cells.fold((x, y, x, y), |(x0, y0, x1, y1), (x, y, _)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }
}
