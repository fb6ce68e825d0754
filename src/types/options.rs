use serde::{Deserialize, Serialize};

use crate::error::{Result, TileMapError};

/// Presentation parameters supplied by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Container suffix: the chart mounts into `chartIdx<idx>`.
    pub idx: String,
    #[serde(default)]
    pub note: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub title: String,
}

impl ChartOptions {
    pub fn new(idx: &str, title: &str, source: &str) -> Self {
        Self {
            idx: idx.to_string(),
            note: String::new(),
            source: source.to_string(),
            subtitle: None,
            title: title.to_string(),
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    /// DOM id of the chart container.
    pub fn container_id(&self) -> String {
        format!("chartIdx{}", self.idx)
    }

    /// Reject options that would render an unaddressable or untitled chart.
    pub fn validate(&self) -> Result<()> {
        if self.idx.trim().is_empty() {
            return Err(TileMapError::Options("`idx` must not be empty".into()));
        }
        if self.idx.chars().any(char::is_whitespace) {
            return Err(TileMapError::Options(format!(
                "`idx` must not contain whitespace: {:?}",
                self.idx
            )));
        }
        if self.title.trim().is_empty() {
            return Err(TileMapError::Options("`title` must not be empty".into()));
        }
        Ok(())
    }

    /// Decode from JSON text (CLI and tests).
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(text).map_err(|e| TileMapError::Options(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}

/// The configuration used for the published FDI chart.
impl Default for ChartOptions {
    fn default() -> Self {
        Self::new(
            "1",
            "Investments in Africa remain low in most countries",
            "UNCTAD",
        )
        .with_note("Data for Libya and Ivory Coast is missing")
        .with_subtitle("Foreign direct investments in Africa, billion USD, 2021")
    }
}
