//! Progress events for a tunefetch run
//!
//! Provides the event definitions emitted by the engine and the EventBus that
//! carries them to the console renderer (or any other subscriber).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Why a candidate was not downloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Title already present in the output directory before the run
    AlreadyExists,
    /// A specific-song entry already claimed its one track
    LineAlreadyServed,
    /// Another entry (or an earlier candidate) already claimed this title for the artist
    ArtistTitleClaimed,
}

impl SkipReason {
    /// Human-readable explanation for console output
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::AlreadyExists => "already exists",
            SkipReason::LineAlreadyServed => "already downloaded one song for this entry",
            SkipReason::ArtistTitleClaimed => "artist already processed in this run",
        }
    }
}

/// tunefetch event types
///
/// Events are broadcast via EventBus and can be serialized for external
/// consumers. `line_id` is always the 1-based source line of the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetchEvent {
    /// Run accepted and about to schedule entries
    RunStarted {
        run_id: Uuid,
        total_entries: usize,
        workers: usize,
        timestamp: DateTime<Utc>,
    },

    /// A worker picked up an entry
    EntryStarted {
        line_id: u32,
        /// Entry kind label ("Song", "Artist", "URL")
        kind: String,
        text: String,
        timestamp: DateTime<Utc>,
    },

    /// Candidate dropped without a download attempt
    CandidateSkipped {
        line_id: u32,
        title: String,
        reason: SkipReason,
        timestamp: DateTime<Utc>,
    },

    /// Resolver returned a playlist; `preview` holds the first selected titles
    PlaylistSelected {
        line_id: u32,
        playlist_title: String,
        selected: usize,
        total: usize,
        preview: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Claimed candidate downloaded
    DownloadSucceeded {
        line_id: u32,
        title: String,
        timestamp: DateTime<Utc>,
    },

    /// Claimed candidate failed to download (title stays claimed)
    DownloadFailed {
        line_id: u32,
        title: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Entry could not be resolved or its worker died
    EntryFailed {
        line_id: u32,
        text: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Entry finished (successfully or not); emitted exactly once per entry
    EntryCompleted {
        line_id: u32,
        text: String,
        /// Successful downloads for this entry
        downloads: usize,
        /// Resolution failed or the worker crashed
        failed: bool,
        /// Never started because the run was cancelled
        cancelled: bool,
        completed: usize,
        total: usize,
        timestamp: DateTime<Utc>,
    },

    /// All entries processed
    RunCompleted {
        run_id: Uuid,
        new_files: usize,
        elapsed_seconds: f64,
        timestamp: DateTime<Utc>,
    },
}

/// Central event distribution bus
///
/// Thin wrapper over a tokio broadcast channel. Slow subscribers lose the
/// oldest events once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FetchEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<FetchEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: FetchEvent,
    ) -> Result<usize, broadcast::error::SendError<FetchEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: FetchEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
