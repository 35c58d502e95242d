//! Resolution worker
//!
//! Processes one entry end to end:
//! build query → resolve → drop existing titles → rank → cap → claim → download
//!
//! # Error Handling
//! - Resolver failures become a zero-outcome entry report
//! - Download failures become a failed outcome; the title stays claimed
//! - Nothing here returns an error to the scheduler

use crate::claims::{extract_artist_key, ClaimRegistry, ClaimScope};
use crate::downloader::Downloader;
use crate::entry::{Entry, EntryKind};
use crate::query::build_query;
use crate::ranker::rank;
use crate::report::{truncate_title, EntryResolution, OutcomeLog, PREVIEW_TITLES};
use crate::resolver::MediaResolver;
use crate::types::{Candidate, DownloadOutcome};
use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tunefetch_common::events::{EventBus, FetchEvent, SkipReason};

/// Shared state handed to every worker of one run
#[derive(Clone)]
pub struct WorkerContext {
    pub resolver: Arc<dyn MediaResolver>,
    pub downloader: Arc<dyn Downloader>,
    pub claims: Arc<ClaimRegistry>,
    pub outcomes: Arc<OutcomeLog>,
    /// Read-only snapshot of titles present before the run
    pub existing: Arc<HashSet<String>>,
    pub destination: PathBuf,
    pub top_n: usize,
    pub event_bus: EventBus,
}

/// Claim scope for a candidate of this entry
///
/// Specific songs are capped per line; artist and URL entries are deduplicated
/// per artist identity derived from the candidate title.
pub fn claim_scope(entry: &Entry, candidate: &Candidate) -> ClaimScope {
    match entry.kind {
        EntryKind::SpecificSong => ClaimScope::PerLine(entry.line_id),
        EntryKind::ArtistQuery | EntryKind::DirectUrl => {
            ClaimScope::PerArtist(extract_artist_key(&candidate.title))
        }
    }
}

fn claim_refusal_reason(entry: &Entry) -> SkipReason {
    match entry.kind {
        EntryKind::SpecificSong => SkipReason::LineAlreadyServed,
        EntryKind::ArtistQuery | EntryKind::DirectUrl => SkipReason::ArtistTitleClaimed,
    }
}

impl WorkerContext {
    fn skip(&self, resolution: &mut EntryResolution, title: &str, reason: SkipReason) {
        let line_id = resolution.entry.line_id;
        debug!(line_id, title = %title, reason = reason.describe(), "Skipping candidate");
        self.event_bus.emit_lossy(FetchEvent::CandidateSkipped {
            line_id,
            title: title.to_string(),
            reason,
            timestamp: Utc::now(),
        });
        resolution.skipped.push((title.to_string(), reason));
    }

    async fn download(&self, line_id: u32, candidate: &Candidate) -> DownloadOutcome {
        match self.downloader.fetch(candidate, &self.destination).await {
            Ok(()) => {
                info!(line_id, title = %candidate.title, "Downloaded");
                self.event_bus.emit_lossy(FetchEvent::DownloadSucceeded {
                    line_id,
                    title: candidate.title.clone(),
                    timestamp: Utc::now(),
                });
                DownloadOutcome::succeeded(line_id, &candidate.title)
            }
            Err(e) => {
                warn!(line_id, title = %candidate.title, error = %e, "Download failed");
                self.event_bus.emit_lossy(FetchEvent::DownloadFailed {
                    line_id,
                    title: candidate.title.clone(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                DownloadOutcome::failed(line_id, &candidate.title, e.to_string())
            }
        }
    }

    fn fail(&self, entry: Entry, error: String) -> EntryResolution {
        warn!(line_id = entry.line_id, entry = %entry.raw_text, error = %error, "Entry failed");
        self.event_bus.emit_lossy(FetchEvent::EntryFailed {
            line_id: entry.line_id,
            text: entry.raw_text.clone(),
            error: error.clone(),
            timestamp: Utc::now(),
        });
        EntryResolution::failed(entry, error)
    }
}

/// Process one entry to completion
pub async fn process_entry(ctx: &WorkerContext, entry: Entry) -> EntryResolution {
    let line_id = entry.line_id;

    info!(line_id, kind = entry.kind.label(), entry = %entry.raw_text, "Processing");
    ctx.event_bus.emit_lossy(FetchEvent::EntryStarted {
        line_id,
        kind: entry.kind.label().to_string(),
        text: entry.raw_text.clone(),
        timestamp: Utc::now(),
    });

    // 1. Resolve
    let query = build_query(&entry, ctx.top_n).to_query_string();
    debug!(line_id, query = %query, resolver = ctx.resolver.name(), "Resolving");

    let resolved = match ctx.resolver.resolve(&query).await {
        Ok(resolved) => resolved,
        Err(e) => return ctx.fail(entry, e.to_string()),
    };

    // 2. Flatten
    let (candidates, playlist_title) = resolved.into_candidates();
    let total = candidates.len();
    if total == 0 {
        return ctx.fail(entry, "Could not find results".to_string());
    }

    let mut resolution = EntryResolution::new(entry);
    resolution.playlist_title = playlist_title;

    // 3. Drop titles already in the library
    let mut fresh = Vec::with_capacity(total);
    for candidate in candidates {
        if ctx.existing.contains(&candidate.normalized_title()) {
            ctx.skip(&mut resolution, &candidate.title, SkipReason::AlreadyExists);
        } else {
            fresh.push(candidate);
        }
    }

    // 4-5. Rank and cap
    let mut ranked = rank(fresh);
    if resolution.entry.kind == EntryKind::SpecificSong {
        ranked.truncate(1);
    }

    if let Some(playlist_title) = &resolution.playlist_title {
        info!(
            line_id,
            playlist = %playlist_title,
            selected = ranked.len(),
            total,
            "Playlist candidates selected"
        );
        ctx.event_bus.emit_lossy(FetchEvent::PlaylistSelected {
            line_id,
            playlist_title: playlist_title.clone(),
            selected: ranked.len(),
            total,
            preview: ranked
                .iter()
                .take(PREVIEW_TITLES)
                .map(|c| truncate_title(&c.title))
                .collect(),
            timestamp: Utc::now(),
        });
    }

    // 6-7. Claim in ranked order, download what was granted
    let mut attempted = 0usize;
    for candidate in ranked {
        let scope = claim_scope(&resolution.entry, &candidate);
        if !ctx.claims.try_claim(&scope, &candidate.normalized_title()) {
            let reason = claim_refusal_reason(&resolution.entry);
            ctx.skip(&mut resolution, &candidate.title, reason);
            continue;
        }

        let outcome = ctx.download(line_id, &candidate).await;
        ctx.outcomes.record(outcome);
        attempted += 1;

        // A granted claim settles a specific song even if the download failed
        if resolution.entry.kind == EntryKind::SpecificSong {
            break;
        }
    }

    if attempted == 0 {
        info!(line_id, entry = %resolution.entry.raw_text, "No new songs downloaded");
    }

    resolution
}
