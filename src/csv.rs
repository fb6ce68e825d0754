//! Minimal header-driven CSV parser producing [`RawRecord`]s.

use crate::types::RawRecord;

/// Parsed CSV: header columns plus one record per data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl CsvTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Parse comma-separated text whose first non-blank line is the header.
///
/// Blank lines are skipped wherever they occur. Header names are trimmed;
/// cell text is kept exactly as written. Short rows leave the missing
/// columns empty; cells past the last header column are dropped.
pub fn parse_csv(text: &str) -> CsvTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return CsvTable::default();
    };
    let headers: Vec<String> = split_csv_line(header_line, ',')
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = lines
        .map(|line| {
            let mut cells = split_csv_line(line, ',').into_iter();
            headers
                .iter()
                .map(|h| {
                    (h.clone(), cells.next().unwrap_or_default())
                })
                .collect::<RawRecord>()
        })
        .collect();

    CsvTable { headers, records }
}

/// Parse CSV text straight into records, discarding the header list.
pub fn parse_records(text: &str) -> Vec<RawRecord> {
    parse_csv(text).records
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
