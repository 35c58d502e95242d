//! Candidate ranking
//!
//! Pure, deterministic ordering of resolver candidates. The output order is
//! the order in which the worker tries to claim candidates.
//!
//! # Algorithm
//! 1. With two or more candidates, drop low-priority renditions (lyrics
//!    videos, covers, karaoke, numbered compilation entries, instrumental or
//!    tutorial versions) as long as at least one canonical rendition remains.
//! 2. Stable sort by:
//!    - non-preferred container last (`webm`)
//!    - longer than [`MAX_SINGLE_TRACK_SECONDS`] last (likely a full album)
//!    - most views first, unknown views counted as 0

use crate::types::Candidate;
use once_cell::sync::Lazy;
use regex::RegexSet;
use std::cmp::Reverse;

/// Tracks longer than this are ranked after shorter ones
pub const MAX_SINGLE_TRACK_SECONDS: f64 = 600.0;

/// Container hint ranked after every other format
const NON_PREFERRED_CONTAINER: &str = "webm";

static LOW_PRIORITY_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\b(?:letra|playback|cover|karaoke)\b",
        r"#\d+",
        r"(?i)\b(?:instrumental|piano|tutorial)\b",
    ])
    .expect("valid regex set")
});

/// True if the title marks a non-canonical rendition
pub fn is_low_priority(title: &str) -> bool {
    LOW_PRIORITY_PATTERNS.is_match(title)
}

fn is_non_preferred_container(candidate: &Candidate) -> bool {
    candidate
        .format_hint
        .to_lowercase()
        .contains(NON_PREFERRED_CONTAINER)
}

fn is_overlong(candidate: &Candidate) -> bool {
    candidate.duration_seconds.unwrap_or(0.0) > MAX_SINGLE_TRACK_SECONDS
}

/// Filter and order candidates for claiming
pub fn rank(candidates: Vec<Candidate>) -> Vec<Candidate> {
    if candidates.len() <= 1 {
        return candidates;
    }

    let (priority, low_priority): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| !is_low_priority(&c.title));

    let mut ranked = if priority.is_empty() {
        low_priority
    } else {
        priority
    };

    ranked.sort_by_key(|c| {
        (
            is_non_preferred_container(c),
            is_overlong(c),
            Reverse(c.view_count.unwrap_or(0)),
        )
    });

    ranked
}
