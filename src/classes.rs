//! Fixed color classes for the choropleth.
//!
//! Boundaries are static so the scale stays comparable across yearly
//! republications; they are never derived from the data's range.

use serde::Serialize;

use crate::types::{Value, UNKNOWN_THRESHOLD};

/// One legend bucket, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ColorClass {
    Unknown,
    BelowHalf,
    HalfToOne,
    OneToTwo,
    TwoToThree,
    AboveThree,
}

/// Bucket definition handed to the chart spec (`from` inclusive, `to` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataClass {
    #[serde(skip)]
    pub class: ColorClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub color: &'static str,
    pub name: &'static str,
}

/// All classes in ascending order.
pub const DATA_CLASSES: [DataClass; 6] = [
    DataClass {
        class: ColorClass::Unknown,
        from: None,
        to: Some(UNKNOWN_THRESHOLD),
        color: "#ffffff",
        name: "Unknown",
    },
    DataClass {
        class: ColorClass::BelowHalf,
        from: Some(UNKNOWN_THRESHOLD),
        to: Some(0.5),
        color: "#9c9e9f",
        name: "Below $0.5 bn",
    },
    DataClass {
        class: ColorClass::HalfToOne,
        from: Some(0.5),
        to: Some(1.0),
        color: "#fabc72",
        name: "$0.5 to 1.0 bn",
    },
    DataClass {
        class: ColorClass::OneToTwo,
        from: Some(1.0),
        to: Some(2.0),
        color: "#f18e00",
        name: "$1.0 to $1.9 bn",
    },
    DataClass {
        class: ColorClass::TwoToThree,
        from: Some(2.0),
        to: Some(3.0),
        color: "#6dbfa9",
        name: "$2.0 to $2.9 bn",
    },
    DataClass {
        class: ColorClass::AboveThree,
        from: Some(3.0),
        to: None,
        color: "#009473",
        name: "Above $3.0 bn",
    },
];

impl ColorClass {
    pub const ALL: [ColorClass; 6] = [
        Self::Unknown,
        Self::BelowHalf,
        Self::HalfToOne,
        Self::OneToTwo,
        Self::TwoToThree,
        Self::AboveThree,
    ];

    pub fn definition(self) -> &'static DataClass {
        match self {
            Self::Unknown => &DATA_CLASSES[0],
            Self::BelowHalf => &DATA_CLASSES[1],
            Self::HalfToOne => &DATA_CLASSES[2],
            Self::OneToTwo => &DATA_CLASSES[3],
            Self::TwoToThree => &DATA_CLASSES[4],
            Self::AboveThree => &DATA_CLASSES[5],
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        self.definition().name
    }

    /// CSS fill color.
    pub fn color(self) -> &'static str {
        self.definition().color
    }

    /// Classify a boundary number (sentinel included). NaN is `Unknown`.
    pub fn of(value: f64) -> Self {
        if value.is_nan() || value <= UNKNOWN_THRESHOLD {
            Self::Unknown
        } else if value < 0.5 {
            Self::BelowHalf
        } else if value < 1.0 {
            Self::HalfToOne
        } else if value < 2.0 {
            Self::OneToTwo
        } else if value < 3.0 {
            Self::TwoToThree
        } else {
            Self::AboveThree
        }
    }

    pub fn of_value(value: Value) -> Self {
        match value {
            Value::Known(v) => Self::of(v),
            Value::Unknown => Self::Unknown,
        }
    }
}

/// Label of the bucket `value` falls into.
pub fn classify(value: f64) -> &'static str {
    ColorClass::of(value).label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(-999.0, "Unknown" ; "sentinel")]
    #[test_case(-900.0, "Unknown" ; "threshold is inclusive")]
    #[test_case(-899.999, "Below $0.5 bn" ; "just above threshold")]
    #[test_case(-3.0, "Below $0.5 bn" ; "negative flow")]
    #[test_case(0.0, "Below $0.5 bn" ; "zero")]
    #[test_case(0.4999, "Below $0.5 bn" ; "below half")]
    #[test_case(0.5, "$0.5 to 1.0 bn" ; "half")]
    #[test_case(0.9999, "$0.5 to 1.0 bn" ; "below one")]
    #[test_case(1.0, "$1.0 to $1.9 bn" ; "one")]
    #[test_case(1.99, "$1.0 to $1.9 bn" ; "below two")]
    #[test_case(2.0, "$2.0 to $2.9 bn" ; "two")]
    #[test_case(2.3, "$2.0 to $2.9 bn" ; "egypt")]
    #[test_case(3.0, "Above $3.0 bn" ; "three")]
    #[test_case(1.0e9, "Above $3.0 bn" ; "huge")]
    #[test_case(f64::NAN, "Unknown" ; "nan")]
    fn test_classify(value: f64, expected: &str) {
        assert_eq!(classify(value), expected);
    }

    #[test]
    fn test_table_matches_classifier() {
        for def in &DATA_CLASSES {
            assert_eq!(def.class.definition().name, def.name);
            if let Some(from) = def.from {
                if def.class != ColorClass::BelowHalf {
                    assert_eq!(ColorClass::of(from), def.class);
                }
            }
        }
    }

    #[test]
    fn test_classes_are_contiguous() {
        for pair in DATA_CLASSES.windows(2) {
            if let [lo, hi] = pair {
                assert_eq!(lo.to, hi.from);
            }
        }
    }

    #[test]
    fn test_unknown_value() {
        assert_eq!(ColorClass::of_value(Value::Unknown), ColorClass::Unknown);
        assert_eq!(ColorClass::of_value(Value::Known(0.7)), ColorClass::HalfToOne);
    }
}
