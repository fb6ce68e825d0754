//! Structured error types for tilemapview.
//!
//! Row-level parse defects are not errors; they are collected as
//! [`FieldDefect`](crate::types::FieldDefect) values on the data set.

/// All errors that can occur while loading and rendering a tile map.
#[derive(Debug, thiserror::Error)]
pub enum TileMapError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// CSV text with no header row.
    #[error("CSV input is empty")]
    EmptyInput,

    /// A column the tile map needs is not in the CSV header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Invalid chart configuration passed by the host page.
    #[error("Invalid chart options: {0}")]
    Options(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// DOM lookup or mutation failure.
    #[error("DOM error: {0}")]
    Dom(String),

    /// JSON serialization error.
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (CLI only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TileMapError>;

impl TileMapError {
    /// True for failures of the fetch stage (HTTP status or transport).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TileMapError> for wasm_bindgen::JsValue {
    fn from(e: TileMapError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
