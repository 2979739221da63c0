use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use super::models::{ApiConfig, HistoryResponse, SubmitRequest, SubmitResponse};
use super::DownloadService;
use crate::domain::{AppError, DownloadRecord, Platform, ResolvedDownload};
use crate::utils::MediaUrl;

const FALLBACK_SERVICE_ERROR: &str = "Failed to download video";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service responded with status {0}")]
    Status(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("API returned error: {0}")]
    Service(String),

    #[error("Download URL not found")]
    NoDownloadUrl,
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Service(message) => AppError::Service(message),
            ApiError::NoDownloadUrl => AppError::MissingResult,
            other => AppError::Network(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Submit a validated URL and classify the single response.
    pub async fn submit_download(&self, url: &MediaUrl) -> Result<ResolvedDownload> {
        let response = self
            .http
            .post(self.config.submit_endpoint())
            .json(&SubmitRequest { url: url.as_str() })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let body = response.text().await?;
        let parsed: Option<SubmitResponse> = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        classify_submit_response(parsed)
    }

    /// Fetch the full download history, in the order the service returns it.
    pub async fn list_downloads(&self) -> Result<Vec<DownloadRecord>> {
        let response = self
            .http
            .post(self.config.history_endpoint())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        Ok(HistoryResponse::from_value(value).downloads)
    }
}

/// Map a decoded submit body to an outcome. A `null` body counts as a service
/// error without a message; empty strings count as absent fields.
pub fn classify_submit_response(response: Option<SubmitResponse>) -> Result<ResolvedDownload> {
    let Some(response) = response else {
        return Err(ApiError::Service(FALLBACK_SERVICE_ERROR.to_string()));
    };

    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return Err(ApiError::Service(error));
    }

    let download = response.download.unwrap_or_default();
    match download.download_url.filter(|u| !u.is_empty()) {
        Some(download_url) if response.success => Ok(ResolvedDownload {
            download_url,
            title: download.title,
            platform: download.platform.map(Platform::from),
        }),
        _ => Err(ApiError::NoDownloadUrl),
    }
}

#[async_trait]
impl DownloadService for ApiClient {
    async fn submit(&self, url: &MediaUrl) -> std::result::Result<ResolvedDownload, AppError> {
        self.submit_download(url).await.map_err(AppError::from)
    }

    async fn fetch_history(&self) -> std::result::Result<Vec<DownloadRecord>, AppError> {
        self.list_downloads()
            .await
            .map_err(|e| AppError::HistoryUnavailable(e.to_string()))
    }
}
