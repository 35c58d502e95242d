//! Input entry classification
//!
//! Each non-blank, non-comment input line becomes one [`Entry`]. The line id
//! is the 1-based line number in the source file, skipped lines included, so
//! report lines can be traced back to the input.

use crate::error::ConfigurationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static DIRECT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:https?://|ytsearch\d*:)").expect("valid regex"));

/// "Artist - Title" with a hyphen or en-dash surrounded by whitespace
static SONG_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S.*?\s+[-–]\s+\S").expect("valid regex"));

/// What an input line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// "Artist - Title": exactly one track for this line
    SpecificSong,
    /// Bare artist name: top N tracks, deduplicated per artist across the run
    ArtistQuery,
    /// URL or explicit resolver query, passed through untouched
    DirectUrl,
}

impl EntryKind {
    /// Short label for console output and events
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::SpecificSong => "Song",
            EntryKind::ArtistQuery => "Artist",
            EntryKind::DirectUrl => "URL",
        }
    }
}

/// One classified input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub line_id: u32,
    pub raw_text: String,
    pub kind: EntryKind,
}

/// True if the text is a URL or an explicit resolver search query
pub fn is_direct_url(text: &str) -> bool {
    DIRECT_URL.is_match(text)
}

/// Classify one input line
///
/// Returns `None` for blank lines and `#` comments.
pub fn classify(line_number: u32, text: &str) -> Option<Entry> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }

    let kind = if is_direct_url(text) {
        EntryKind::DirectUrl
    } else if SONG_SEPARATOR.is_match(text) {
        EntryKind::SpecificSong
    } else {
        EntryKind::ArtistQuery
    };

    Some(Entry {
        line_id: line_number,
        raw_text: text.to_string(),
        kind,
    })
}

/// Classify every line of an input document, preserving order
pub fn parse_entries(content: &str) -> Vec<Entry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| classify(index as u32 + 1, line))
        .collect()
}

/// Read and classify an input file
pub fn read_entries(path: &Path) -> Result<Vec<Entry>, ConfigurationError> {
    if !path.exists() {
        return Err(ConfigurationError::InputNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(tunefetch_common::Error::from)?;
    let content = String::from_utf8(bytes).map_err(|e| {
        tunefetch_common::Error::InvalidInput(format!(
            "{} is not UTF-8 text: {}",
            path.display(),
            e.utf8_error()
        ))
    })?;
    let entries = parse_entries(&content);

    if entries.is_empty() {
        return Err(ConfigurationError::NoEntries(path.to_path_buf()));
    }

    Ok(entries)
}
