use super::stderr_summary;
use crate::downloader::Downloader;
use crate::error::DownloadError;
use crate::types::Candidate;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tunefetch_common::config::YtDlpConfig;

/// Output file name template; the file stem is the video title
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Downloads best audio and converts it with yt-dlp's ffmpeg postprocessor
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    binary: String,
    audio_format: String,
    audio_quality: String,
}

impl YtDlpDownloader {
    pub fn new(config: &YtDlpConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// Full argument list for one download
    pub fn arguments(&self, url: &str, destination: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            "bestaudio/best".to_string(),
            "-x".to_string(),
            "--audio-format".to_string(),
            self.audio_format.clone(),
            "--audio-quality".to_string(),
            self.audio_quality.clone(),
            "--embed-metadata".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "-o".to_string(),
            OUTPUT_TEMPLATE.to_string(),
            "-P".to_string(),
            destination.to_string_lossy().into_owned(),
            "--no-playlist".to_string(),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, candidate: &Candidate, destination: &Path) -> Result<(), DownloadError> {
        let url = candidate
            .source_url
            .as_deref()
            .ok_or_else(|| DownloadError::MissingSource(candidate.title.clone()))?;

        tracing::debug!(title = %candidate.title, url, "Starting yt-dlp download");

        let output = Command::new(&self.binary)
            .args(self.arguments(url, destination))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            return Err(DownloadError::Failed(stderr_summary(&output.stderr)));
        }

        Ok(())
    }
}
