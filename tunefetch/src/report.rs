//! Run report
//!
//! Workers append [`DownloadOutcome`]s to a shared [`OutcomeLog`] as attempts
//! complete. Once the scheduler returns, the log and the per-entry resolutions
//! are assembled into a [`RunReport`] sorted by line id.

use crate::entry::{Entry, EntryKind};
use crate::types::DownloadOutcome;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tunefetch_common::events::SkipReason;
use uuid::Uuid;

/// Titles shown per line before the list is cut
pub const PREVIEW_TITLES: usize = 3;

/// Characters shown per title in the summary
pub const PREVIEW_TITLE_CHARS: usize = 40;

/// Thread-safe accumulator of download outcomes, in completion order
#[derive(Debug, Default)]
pub struct OutcomeLog {
    outcomes: Mutex<Vec<DownloadOutcome>>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DownloadOutcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, outcome: DownloadOutcome) {
        self.lock().push(outcome);
    }

    /// Outcomes recorded for one line, in completion order
    pub fn for_line(&self, line_id: u32) -> Vec<DownloadOutcome> {
        self.lock()
            .iter()
            .filter(|o| o.line_id == line_id)
            .cloned()
            .collect()
    }

    /// Copy of every outcome in completion order
    pub fn snapshot(&self) -> Vec<DownloadOutcome> {
        self.lock().clone()
    }
}

/// What a worker observed while processing one entry, besides outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct EntryResolution {
    pub entry: Entry,
    /// Playlist title when the resolver returned a playlist
    pub playlist_title: Option<String>,
    /// Candidates dropped without a download attempt
    pub skipped: Vec<(String, SkipReason)>,
    /// Resolver failure or worker crash
    pub error: Option<String>,
    /// Entry was never started because the run was cancelled
    pub cancelled: bool,
}

impl EntryResolution {
    pub fn new(entry: Entry) -> Self {
        Self {
            entry,
            playlist_title: None,
            skipped: Vec::new(),
            error: None,
            cancelled: false,
        }
    }

    pub fn failed(entry: Entry, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(entry)
        }
    }

    pub fn cancelled(entry: Entry) -> Self {
        Self {
            cancelled: true,
            ..Self::new(entry)
        }
    }
}

/// Final per-line report
#[derive(Debug, Clone, PartialEq)]
pub struct EntryReport {
    pub line_id: u32,
    pub kind: EntryKind,
    pub text: String,
    pub playlist_title: Option<String>,
    pub outcomes: Vec<DownloadOutcome>,
    pub skipped: Vec<(String, SkipReason)>,
    pub error: Option<String>,
    pub cancelled: bool,
}

impl EntryReport {
    /// Titles downloaded successfully, in completion order
    pub fn downloaded_titles(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.success)
            .map(|o| o.title.as_str())
            .collect()
    }

    pub fn failed_downloads(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }

    /// "N (list)" cell for the summary table
    pub fn summary_cell(&self) -> String {
        let titles = self.downloaded_titles();
        format!("{} ({})", titles.len(), format_title_list(&titles))
    }
}

/// Shorten one title for display
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > PREVIEW_TITLE_CHARS {
        let head: String = title.chars().take(PREVIEW_TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Quoted, comma-separated preview of titles, cut to the first three
pub fn format_title_list(titles: &[&str]) -> String {
    if titles.is_empty() {
        return "None".to_string();
    }

    let mut list = titles
        .iter()
        .take(PREVIEW_TITLES)
        .map(|t| format!("'{}'", truncate_title(t)))
        .collect::<Vec<_>>()
        .join(", ");

    if titles.len() > PREVIEW_TITLES {
        list.push_str(&format!(" +{} more", titles.len() - PREVIEW_TITLES));
    }

    list
}

/// Aggregated result of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Per-line reports, sorted by line id
    pub entries: Vec<EntryReport>,
    /// Files present before the run
    pub files_before: usize,
    /// Files present after the run
    pub files_after: usize,
    /// Titles on disk after the run that were not there before
    pub new_files: usize,
    /// Outcomes reported as successful by the downloader
    pub confirmed_downloads: usize,
    pub failed_downloads: usize,
    pub elapsed: Duration,
    pub output_dir: PathBuf,
}

impl RunReport {
    /// Combine per-entry resolutions with recorded outcomes and both library scans
    pub fn assemble(
        run_id: Uuid,
        resolutions: Vec<EntryResolution>,
        outcomes: Vec<DownloadOutcome>,
        before: &HashSet<String>,
        after: &HashSet<String>,
        elapsed: Duration,
        output_dir: PathBuf,
    ) -> Self {
        let mut entries: Vec<EntryReport> = resolutions
            .into_iter()
            .map(|resolution| {
                let line_id = resolution.entry.line_id;
                EntryReport {
                    line_id,
                    kind: resolution.entry.kind,
                    text: resolution.entry.raw_text,
                    playlist_title: resolution.playlist_title,
                    outcomes: outcomes
                        .iter()
                        .filter(|o| o.line_id == line_id)
                        .cloned()
                        .collect(),
                    skipped: resolution.skipped,
                    error: resolution.error,
                    cancelled: resolution.cancelled,
                }
            })
            .collect();
        entries.sort_by_key(|e| e.line_id);

        let confirmed_downloads = outcomes.iter().filter(|o| o.success).count();
        let failed_downloads = outcomes.len() - confirmed_downloads;

        Self {
            run_id,
            entries,
            files_before: before.len(),
            files_after: after.len(),
            new_files: after.difference(before).count(),
            confirmed_downloads,
            failed_downloads,
            elapsed,
            output_dir,
        }
    }

    /// Report for one line
    pub fn entry(&self, line_id: u32) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.line_id == line_id)
    }

    pub fn total_outcomes(&self) -> usize {
        self.entries.iter().map(|e| e.outcomes.len()).sum()
    }

    pub fn specific_song_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::SpecificSong)
            .count()
    }

    /// Entries that failed to resolve
    pub fn failed_entries(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.error.is_some())
    }
}
