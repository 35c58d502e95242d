//! Bounded-parallel scheduler
//!
//! Runs every entry through [`process_entry`] with at most `workers` entries in
//! flight. Each entry is spawned as its own task so a panicking worker only
//! takes down its own entry.

use crate::entry::Entry;
use crate::report::EntryResolution;
use crate::worker::{process_entry, WorkerContext};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tunefetch_common::events::FetchEvent;

/// Schedules entries across a fixed number of concurrent workers
#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    cancel: CancellationToken,
}

impl Scheduler {
    /// `workers` is clamped to at least 1
    pub fn new(workers: usize, cancel: CancellationToken) -> Self {
        Self {
            workers: workers.max(1),
            cancel,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process all entries and return one resolution per entry
    ///
    /// Entries not yet started when the token is cancelled come back marked
    /// cancelled. Entries already running finish normally. Every entry emits
    /// exactly one `EntryCompleted`.
    pub async fn run(&self, entries: Vec<Entry>, ctx: WorkerContext) -> Vec<EntryResolution> {
        let total = entries.len();
        let completed = Arc::new(AtomicUsize::new(0));

        stream::iter(entries)
            .map(|entry| {
                let ctx = ctx.clone();
                let cancel = self.cancel.clone();
                let completed = completed.clone();

                async move {
                    let line_id = entry.line_id;

                    let resolution = if cancel.is_cancelled() {
                        tracing::debug!(line_id, "Skipping entry, run cancelled");
                        EntryResolution::cancelled(entry)
                    } else {
                        let fallback = entry.clone();
                        let worker_ctx = ctx.clone();
                        let handle =
                            tokio::spawn(async move { process_entry(&worker_ctx, entry).await });

                        match handle.await {
                            Ok(resolution) => resolution,
                            Err(e) => {
                                let error = format!("Worker crashed: {}", e);
                                tracing::error!(line_id, error = %error, "Worker task failed");
                                ctx.event_bus.emit_lossy(FetchEvent::EntryFailed {
                                    line_id,
                                    text: fallback.raw_text.clone(),
                                    error: error.clone(),
                                    timestamp: Utc::now(),
                                });
                                EntryResolution::failed(fallback, error)
                            }
                        }
                    };

                    let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    let downloads = ctx
                        .outcomes
                        .for_line(line_id)
                        .iter()
                        .filter(|o| o.success)
                        .count();

                    tracing::info!(
                        line_id,
                        downloads,
                        progress = format!("{}/{}", current, total),
                        "Entry completed"
                    );
                    ctx.event_bus.emit_lossy(FetchEvent::EntryCompleted {
                        line_id,
                        text: resolution.entry.raw_text.clone(),
                        downloads,
                        failed: resolution.error.is_some(),
                        cancelled: resolution.cancelled,
                        completed: current,
                        total,
                        timestamp: Utc::now(),
                    });

                    resolution
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_clamped() {
        let scheduler = Scheduler::new(0, CancellationToken::new());
        assert_eq!(scheduler.workers(), 1);
        assert_eq!(Scheduler::new(8, CancellationToken::new()).workers(), 8);
    }
}
