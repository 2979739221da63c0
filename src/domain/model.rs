use std::fmt;

use serde::Deserialize;

const UNTITLED: &str = "Untitled";

/// Artifact returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub download_url: String,
    pub title: Option<String>,
    pub platform: Option<Platform>,
}

/// Identifier of a history record; the service may send it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Platform {
    YouTube,
    Facebook,
    Instagram,
    Other(String),
}

impl Platform {
    pub const SUPPORTED: [Platform; 3] = [Platform::YouTube, Platform::Facebook, Platform::Instagram];

    pub fn name(&self) -> &str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Other(name) => name,
        }
    }

    /// Lowercased platform name, used to pick an icon.
    pub fn icon_key(&self) -> String {
        self.name().to_lowercase()
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "youtube" => Platform::YouTube,
            "facebook" => Platform::Facebook,
            "instagram" => Platform::Instagram,
            _ => Platform::Other(value),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Other("Unknown".to_string())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum RecordStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "Pending",
            RecordStatus::Completed => "Completed",
            RecordStatus::Failed => "Failed",
        }
    }

    pub fn icon_key(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "clock",
            RecordStatus::Completed => "check-circle",
            RecordStatus::Failed => "times-circle",
        }
    }
}

impl From<String> for RecordStatus {
    // Anything the service reports that is neither completed nor failed is still in progress
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "completed" => RecordStatus::Completed,
            "failed" => RecordStatus::Failed,
            _ => RecordStatus::Pending,
        }
    }
}

/// What a history entry offers the user, derived from its status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance<'a> {
    Download(&'a str),
    InProgress,
    Failed,
    Unavailable,
}

/// A past download attempt as reported by the history service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl DownloadRecord {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }

    pub fn affordance(&self) -> Affordance<'_> {
        match self.status {
            RecordStatus::Completed => match self.download_url.as_deref() {
                Some(url) if !url.is_empty() => Affordance::Download(url),
                _ => Affordance::Unavailable,
            },
            RecordStatus::Pending => Affordance::InProgress,
            RecordStatus::Failed => Affordance::Failed,
        }
    }
}
