//! Core value types shared across the engine

use serde::{Deserialize, Serialize};

/// Title used when the resolver reports a track without one
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One track returned by the media resolver, not yet downloaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display title as reported by the resolver
    pub title: String,
    /// Track length in seconds, when known
    pub duration_seconds: Option<f64>,
    /// Popularity, when known
    pub view_count: Option<u64>,
    /// Container/extension hint ("webm", "m4a", ...)
    pub format_hint: String,
    /// Whether the candidate came out of a playlist result
    pub source_entry_playlist: bool,
    /// Page URL the downloader should fetch
    pub source_url: Option<String>,
}

impl Candidate {
    /// Create a candidate with only a title; other fields unknown
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration_seconds: None,
            view_count: None,
            format_hint: String::new(),
            source_entry_playlist: false,
            source_url: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.view_count = Some(views);
        self
    }

    pub fn with_format(mut self, format_hint: impl Into<String>) -> Self {
        self.format_hint = format_hint.into();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Case-folded title used for every dedup comparison
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Case-fold a title for dedup comparisons
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

/// Result of one claimed-and-attempted download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    pub line_id: u32,
    pub title: String,
    pub success: bool,
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn succeeded(line_id: u32, title: impl Into<String>) -> Self {
        Self {
            line_id,
            title: title.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(line_id: u32, title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            line_id,
            title: title.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}
