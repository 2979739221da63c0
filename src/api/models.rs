use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DownloadRecord;

/// Body of the submit-download request
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest<'a> {
    pub url: &'a str,
}

/// Response from the submit-download endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub download: Option<DownloadInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Response from the list-downloads endpoint.
///
/// Decoded leniently: a missing or malformed `downloads` field is an empty
/// history, and entries that fail to decode are dropped without reordering the rest.
#[derive(Debug, Clone, Default)]
pub struct HistoryResponse {
    pub downloads: Vec<DownloadRecord>,
}

impl HistoryResponse {
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(mut map) => match map.remove("downloads") {
                Some(Value::Array(entries)) => entries,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    log::warn!("Ignoring malformed downloads field: {}", other);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        let downloads = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping undecodable history entry: {}", e);
                    None
                }
            })
            .collect();

        Self { downloads }
    }
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub submit_path: String,
    pub history_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            submit_path: "/api/download-video".to_string(),
            history_path: "/api/list-downloads".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_submit_path(mut self, path: impl Into<String>) -> Self {
        self.submit_path = path.into();
        self
    }

    pub fn with_history_path(mut self, path: impl Into<String>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn submit_endpoint(&self) -> String {
        self.endpoint(&self.submit_path)
    }

    pub fn history_endpoint(&self) -> String {
        self.endpoint(&self.history_path)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
