//! Number and tooltip formatting.

use crate::types::{DataPoint, Value};

/// Unit suffix shown after tooltip values.
pub const VALUE_UNIT: &str = "billion USD";

/// Text shown for missing values.
pub const UNKNOWN_TEXT: &str = "Unknown";

/// Round to `decimals` places, halves toward positive infinity.
pub fn round_nr(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    // `+ 0.0` turns -0.0 into 0.0.
    (value * factor + 0.5).floor() / factor + 0.0
}

/// Format with fixed decimals and `,` thousands separators (`1234.5` -> `1,234.5`).
pub fn format_grouped(value: f64, decimals: u8) -> String {
    let fixed = format!("{:.*}", usize::from(decimals), round_nr(value, decimals));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    out.push_str(sign);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Tooltip body for a value: `"2.3 billion USD"` or `"Unknown"`.
pub fn format_value(value: Value) -> String {
    match value {
        Value::Known(v) => format!("{} {VALUE_UNIT}", format_grouped(v, 1)),
        Value::Unknown => UNKNOWN_TEXT.to_string(),
    }
}

/// Tooltip for a boundary number, honoring the sentinel.
pub fn format_tooltip_value(value: f64) -> String {
    format_value(Value::from_f64(value))
}

/// Tooltip content for a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub header: String,
    pub body: String,
}

impl Tooltip {
    pub fn for_point(point: &DataPoint) -> Self {
        Self {
            header: point.display_name(),
            body: format_value(point.value),
        }
    }

    /// HTML fragment for the floating tooltip element.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"tooltip_container\"><h3 class=\"tooltip_header\">{}</h3>\
             <div><span class=\"tooltip_label\"></span><span class=\"tooltip_value\">{}</span></div></div>",
            escape_html(&self.header),
            escape_html(&self.body)
        )
    }
}

/// Escape text for insertion into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::UNKNOWN_SENTINEL;
    use test_case::test_case;

    #[test_case(2.34, "2.3 billion USD")]
    #[test_case(2.0, "2.0 billion USD" ; "keeps trailing zero")]
    #[test_case(0.06, "0.1 billion USD")]
    #[test_case(1234.56, "1,234.6 billion USD" ; "grouped")]
    #[test_case(-0.04, "0.0 billion USD" ; "no negative zero")]
    #[test_case(UNKNOWN_SENTINEL, "Unknown" ; "sentinel")]
    fn test_format_tooltip_value(value: f64, expected: &str) {
        assert_eq!(format_tooltip_value(value), expected);
    }

    #[test_case(0.0, 1, "0.0")]
    #[test_case(999.94, 1, "999.9")]
    #[test_case(999.96, 1, "1,000.0")]
    #[test_case(1234567.0, 0, "1,234,567")]
    #[test_case(-1234.5, 1, "-1,234.5")]
    fn test_format_grouped(value: f64, decimals: u8, expected: &str) {
        assert_eq!(format_grouped(value, decimals), expected);
    }

    #[test]
    fn test_round_nr_half_up() {
        assert_eq!(round_nr(2.25, 1), 2.3);
        assert_eq!(round_nr(-2.25, 1), -2.2);
        assert_eq!(round_nr(7.0, 0), 7.0);
    }

    #[test]
    fn test_tooltip_html_is_escaped() {
        let p = DataPoint::new(0, 0, Value::Known(2.34)).with_field("name", "A<B");
        let html = Tooltip::for_point(&p).to_html();
        assert!(html.contains("<h3 class=\"tooltip_header\">A&lt;B</h3>"));
        assert!(html.contains("2.3 billion USD"));
    }
}
