//! Resolution-and-claim engine
//!
//! Owns the per-run state and drives one run:
//!
//! 1. Ensure the output directory exists
//! 2. Snapshot the existing library (empty exclusion set in force mode)
//! 3. Fan entries out over the [`Scheduler`]
//! 4. Re-scan the library and assemble the [`RunReport`]
//!
//! The claim registry and outcome log are created fresh for every call to
//! [`Engine::run`], so dedup state never leaks between runs.

use crate::claims::ClaimRegistry;
use crate::config::EngineConfig;
use crate::downloader::Downloader;
use crate::entry::Entry;
use crate::error::{ConfigurationError, EngineResult};
use crate::library::{FsLibraryScanner, LibraryScanner};
use crate::report::{OutcomeLog, RunReport};
use crate::resolver::MediaResolver;
use crate::scheduler::Scheduler;
use crate::worker::WorkerContext;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tunefetch_common::events::{EventBus, FetchEvent};
use uuid::Uuid;

/// Default event channel capacity
const EVENT_CAPACITY: usize = 1024;

pub struct Engine {
    config: EngineConfig,
    resolver: Arc<dyn MediaResolver>,
    downloader: Arc<dyn Downloader>,
    scanner: Arc<dyn LibraryScanner>,
    event_bus: EventBus,
    cancel: CancellationToken,
}

impl Engine {
    /// Create an engine; fails on invalid configuration
    pub fn new(
        config: EngineConfig,
        resolver: Arc<dyn MediaResolver>,
        downloader: Arc<dyn Downloader>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let scanner = Arc::new(FsLibraryScanner::with_extensions(
            config.audio_extensions.iter().cloned(),
        ));

        Ok(Self {
            config,
            resolver,
            downloader,
            scanner,
            event_bus: EventBus::new(EVENT_CAPACITY),
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the library scanner
    pub fn with_scanner(mut self, scanner: Arc<dyn LibraryScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Publish progress on an existing bus
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }

    /// Token that stops new entries from starting when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Titles currently in the output directory
    ///
    /// A missing output directory counts as an empty library.
    pub fn existing_titles(&self) -> EngineResult<HashSet<String>> {
        if !self.config.output_dir.exists() {
            return Ok(HashSet::new());
        }
        Ok(self.scanner.scan(&self.config.output_dir)?)
    }

    /// Process every entry and return the run report
    ///
    /// Only configuration and library-scan failures are errors. Per-entry
    /// failures are recorded in the report.
    pub async fn run(&self, entries: Vec<Entry>) -> EngineResult<RunReport> {
        let run_id = Uuid::new_v4();
        let start_time = Instant::now();
        let output_dir = self.config.output_dir.clone();

        tokio::fs::create_dir_all(&output_dir).await.map_err(|e| {
            ConfigurationError::OutputDirectory(output_dir.clone(), e.to_string())
        })?;

        let before = self.scanner.scan(&output_dir)?;
        let exclusions = if self.config.force {
            info!(existing = before.len(), "Force mode: ignoring existing library");
            HashSet::new()
        } else {
            before.clone()
        };

        info!(
            run_id = %run_id,
            entries = entries.len(),
            workers = self.config.threads,
            top_n = self.config.top_n,
            existing = before.len(),
            output_dir = %output_dir.display(),
            "Starting run"
        );
        self.event_bus.emit_lossy(FetchEvent::RunStarted {
            run_id,
            total_entries: entries.len(),
            workers: self.config.threads,
            timestamp: Utc::now(),
        });

        let outcomes = Arc::new(OutcomeLog::new());
        let ctx = WorkerContext {
            resolver: self.resolver.clone(),
            downloader: self.downloader.clone(),
            claims: Arc::new(ClaimRegistry::new()),
            outcomes: outcomes.clone(),
            existing: Arc::new(exclusions),
            destination: output_dir.clone(),
            top_n: self.config.top_n,
            event_bus: self.event_bus.clone(),
        };

        let scheduler = Scheduler::new(self.config.threads, self.cancel.clone());
        let resolutions = scheduler.run(entries, ctx).await;

        let after = self.scanner.scan(&output_dir)?;
        let elapsed = start_time.elapsed();

        let report = RunReport::assemble(
            run_id,
            resolutions,
            outcomes.snapshot(),
            &before,
            &after,
            elapsed,
            output_dir,
        );

        info!(
            run_id = %run_id,
            new_files = report.new_files,
            confirmed = report.confirmed_downloads,
            failed = report.failed_downloads,
            elapsed_secs = elapsed.as_secs_f64(),
            "Run completed"
        );
        self.event_bus.emit_lossy(FetchEvent::RunCompleted {
            run_id,
            new_files: report.new_files,
            elapsed_seconds: elapsed.as_secs_f64(),
            timestamp: Utc::now(),
        });

        Ok(report)
    }
}
