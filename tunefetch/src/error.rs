//! Error types for tunefetch
//!
//! Errors are isolated per entry: resolution and download errors end up in
//! the run report, only configuration errors abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Media resolver failure for one query
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Resolver ran but reported a failure
    #[error("{0}")]
    Failed(String),

    /// Resolver produced output that could not be parsed
    #[error("Invalid resolver output: {0}")]
    InvalidOutput(String),

    /// Resolver process could not be started
    #[error("Resolver I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloader failure for one claimed candidate
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Candidate carried no URL to fetch
    #[error("No source URL for '{0}'")]
    MissingSource(String),

    /// Downloader ran but reported a failure
    #[error("{0}")]
    Failed(String),

    /// Downloader process could not be started
    #[error("Downloader I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Existing-library scan failure
#[derive(Debug, Error)]
pub enum ScanError {
    /// Output directory does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Fatal errors detected before scheduling starts
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Thread count must be at least 1 (got {0})")]
    InvalidThreadCount(usize),

    #[error("Top result count must be at least 1 (got {0})")]
    InvalidTopCount(usize),

    #[error("Media resolver unavailable: {0}")]
    ResolverUnavailable(String),

    #[error("Input file '{0}' not found")]
    InputNotFound(PathBuf),

    #[error("No valid entries found in {0}")]
    NoEntries(PathBuf),

    #[error("Output directory {0} unusable: {1}")]
    OutputDirectory(PathBuf, String),

    #[error(transparent)]
    Common(#[from] tunefetch_common::Error),
}

/// Run-level error returned by the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Library scan failed: {0}")]
    Scan(#[from] ScanError),
}

/// Result type for engine runs
pub type EngineResult<T> = Result<T, EngineError>;
