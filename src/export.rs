//! Export menu model and the data-table download.
//!
//! The browser side (downloads, print, full screen) lives in the widget;
//! this module only decides what the menu holds and what the CSV contains.

use serde::Serialize;

use crate::types::DataSet;

/// An entry of the export context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuItem {
    ViewFullscreen,
    Separator,
    DownloadPng,
    DownloadPdf,
    DownloadCsv,
}

impl MenuItem {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::ViewFullscreen => Some("View in full screen"),
            Self::Separator => None,
            Self::DownloadPng => Some("Download PNG image"),
            Self::DownloadPdf => Some("Download PDF document"),
            Self::DownloadCsv => Some("Download CSV data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMenu {
    pub enabled: bool,
    pub items: Vec<MenuItem>,
}

impl Default for ExportMenu {
    fn default() -> Self {
        Self {
            enabled: true,
            items: vec![
                MenuItem::ViewFullscreen,
                MenuItem::Separator,
                MenuItem::DownloadPng,
                MenuItem::DownloadPdf,
                MenuItem::Separator,
                MenuItem::DownloadCsv,
            ],
        }
    }
}

impl ExportMenu {
    pub fn contains(&self, item: MenuItem) -> bool {
        self.items.contains(&item)
    }
}

/// Build a download file name from the chart title (`"Hello, World!"` -> `hello-world.csv`).
pub fn export_filename(title: &str, extension: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let stem = if slug.is_empty() { "chart" } else { slug };
    format!("{stem}.{extension}")
}

/// Render the data set as CSV: `x,y,value` then pass-through columns in
/// first-seen order. Unknown values are left empty.
pub fn data_table_csv(data: &DataSet) -> String {
    let mut extra: Vec<&str> = Vec::new();
    for point in data.iter() {
        for key in point.fields.keys() {
            if !extra.contains(&key) {
                extra.push(key);
            }
        }
    }

    let mut out = String::from("x,y,value");
    for key in &extra {
        out.push(',');
        out.push_str(&csv_cell(key));
    }
    out.push('\n');

    for point in data.iter() {
        if let Some(x) = point.x {
            out.push_str(&x.to_string());
        }
        out.push(',');
        if let Some(y) = point.y {
            out.push_str(&y.to_string());
        }
        out.push(',');
        if let Some(v) = point.value.known() {
            out.push_str(&v.to_string());
        }
        for key in &extra {
            out.push(',');
            out.push_str(&csv_cell(point.field(key).unwrap_or_default()));
        }
        out.push('\n');
    }
    out
}

fn csv_cell(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
