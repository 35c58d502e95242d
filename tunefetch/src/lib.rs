//! tunefetch library interface
//!
//! Concurrent resolution-and-claim engine for batch music downloads. The CLI
//! in `main.rs` wires the yt-dlp adapters into [`Engine`]; tests wire fakes.

pub mod claims;
pub mod config;
pub mod console;
pub mod downloader;
pub mod engine;
pub mod entry;
pub mod error;
pub mod library;
pub mod query;
pub mod ranker;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod types;
pub mod worker;
pub mod ytdlp;

pub use crate::claims::{extract_artist_key, ClaimRegistry, ClaimScope};
pub use crate::config::{ConfigOverrides, EngineConfig};
pub use crate::downloader::Downloader;
pub use crate::engine::Engine;
pub use crate::entry::{classify, parse_entries, read_entries, Entry, EntryKind};
pub use crate::error::{
    ConfigurationError, DownloadError, EngineError, EngineResult, ResolutionError, ScanError,
};
pub use crate::library::{FsLibraryScanner, LibraryScanner};
pub use crate::ranker::rank;
pub use crate::report::{EntryReport, RunReport};
pub use crate::resolver::{MediaResolver, ResolvedResult};
pub use crate::types::{normalize_title, Candidate, DownloadOutcome};
