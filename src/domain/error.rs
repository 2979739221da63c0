use thiserror::Error;

const INVALID_URL_MESSAGE: &str = "Please enter a valid URL";
const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download video";
const HISTORY_UNAVAILABLE_MESSAGE: &str = "Failed to load download history";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Response did not contain a download URL")]
    MissingResult,

    #[error("Download history unavailable: {0}")]
    HistoryUnavailable(String),
}

impl AppError {
    /// Text shown to the user. `Display` carries the diagnostic detail instead.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidUrl => INVALID_URL_MESSAGE.to_string(),
            AppError::Service(message) => message.clone(),
            AppError::Network(_) | AppError::MissingResult => DOWNLOAD_FAILED_MESSAGE.to_string(),
            AppError::HistoryUnavailable(_) => HISTORY_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}
