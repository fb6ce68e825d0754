//! Where the CSV comes from, and fetching it in the browser.

use serde::{Deserialize, Serialize};

/// Location of the dataset, switched on the hosting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSource {
    /// Substring of the page URL that selects `remote_base`.
    pub remote_host_marker: String,
    pub remote_base: String,
    pub local_base: String,
    /// Path appended to the chosen base.
    pub path: String,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            remote_host_marker: "unctad.org".to_string(),
            remote_base: "https://storage.unctad.org/2023-fdi_flows_africa/".to_string(),
            local_base: "./".to_string(),
            path: "assets/data/2023-fdi_flows_africa_data.csv".to_string(),
        }
    }
}

impl DataSource {
    /// Resolve the CSV URL for a page at `href`.
    pub fn url_for(&self, href: &str) -> String {
        let base = if !self.remote_host_marker.is_empty() && href.contains(&self.remote_host_marker)
        {
            &self.remote_base
        } else {
            &self.local_base
        };
        format!("{base}{}", self.path)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::fetch_csv;

#[cfg(target_arch = "wasm32")]
mod web {
    use gloo_net::http::Request;

    use crate::error::{Result, TileMapError};

    /// GET `url` and return the body text. Non-2xx fails with the status text.
    pub async fn fetch_csv(url: &str) -> Result<String> {
        let resp = Request::get(url)
            .send()
            .await
            .map_err(|e| TileMapError::Network(e.to_string()))?;

        if !resp.ok() {
            return Err(TileMapError::Http {
                status: resp.status(),
                status_text: resp.status_text(),
            });
        }

        resp.text()
            .await
            .map_err(|e| TileMapError::Network(format!("reading body: {e}")))
    }
}
