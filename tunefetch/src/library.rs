//! Existing-library scanner
//!
//! Enumerates tracks already present in the output directory. The engine
//! takes one snapshot before scheduling (exclusion set) and one after all
//! workers finish (new-file count).

use crate::error::ScanError;
use crate::types::normalize_title;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Extensions recognised when no configuration is given
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3"];

/// Produces the normalized titles of tracks already on disk
pub trait LibraryScanner: Send + Sync {
    fn scan(&self, dir: &Path) -> Result<HashSet<String>, ScanError>;
}

/// Filesystem scanner: file stems of audio files directly inside `dir`
#[derive(Debug, Clone)]
pub struct FsLibraryScanner {
    extensions: Vec<String>,
}

impl FsLibraryScanner {
    /// Scanner for the default extensions
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_AUDIO_EXTENSIONS.iter().map(|e| e.to_string()))
    }

    /// Scanner for a custom extension list (case-insensitive, leading dot optional)
    pub fn with_extensions(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    fn is_audio_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

impl Default for FsLibraryScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryScanner for FsLibraryScanner {
    fn scan(&self, dir: &Path) -> Result<HashSet<String>, ScanError> {
        if !dir.exists() {
            return Err(ScanError::PathNotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let mut titles = HashSet::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let is_audio = path
                .extension()
                .map(|ext| self.is_audio_extension(&ext.to_string_lossy()))
                .unwrap_or(false);
            if !is_audio {
                continue;
            }

            if let Some(stem) = path.file_stem() {
                titles.insert(normalize_title(&stem.to_string_lossy()));
            }
        }

        tracing::debug!(dir = %dir.display(), count = titles.len(), "Library scan complete");

        Ok(titles)
    }
}
