mod client;
mod models;

use async_trait::async_trait;
use crate::domain::{AppError, DownloadRecord, ResolvedDownload};
use crate::utils::MediaUrl;

pub use client::ApiClient;
pub use models::ApiConfig;

/// The external download service: one submit call and one history listing.
#[async_trait]
pub trait DownloadService: Send + Sync {
    /// Exactly one attempt; no retries.
    async fn submit(&self, url: &MediaUrl) -> std::result::Result<ResolvedDownload, AppError>;

    async fn fetch_history(&self) -> std::result::Result<Vec<DownloadRecord>, AppError>;
}
