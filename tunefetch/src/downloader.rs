//! Downloader interface

use crate::error::DownloadError;
use crate::types::Candidate;
use async_trait::async_trait;
use std::path::Path;

/// Fetches one claimed candidate into the destination directory
///
/// Implementations write one audio file named after the candidate title.
/// They are not expected to deduplicate; the engine only calls `fetch` for
/// candidates it has claimed.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloader name for logs
    fn name(&self) -> &'static str;

    async fn fetch(&self, candidate: &Candidate, destination: &Path) -> Result<(), DownloadError>;
}
