//! Claim registry
//!
//! Thread-safe record of which (scope, title) pairs have been reserved for
//! download during one run. A claim is a check-and-insert performed under a
//! single lock, so two workers racing for the same pair always produce exactly
//! one winner. Claims are never released, even when the download fails.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Separators that split "Artist - Title" style track names
const ARTIST_SEPARATORS: [char; 3] = ['-', '–', '|'];

static FEATURING_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)\s+(?:feat\.?|ft\.?|com)\s+").expect("valid regex")
});

/// Unit of deduplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimScope {
    /// Specific-song entry: one claim in total for the line
    PerLine(u32),
    /// Artist identity: one claim per distinct title, any number of titles
    PerArtist(String),
}

/// Derive the artist identity of a track title
///
/// Text before the first `-`, `–` or `|`; failing that, text before a
/// `feat`/`ft`/`com` marker; failing that, the whole title. Always lowercased.
pub fn extract_artist_key(title: &str) -> String {
    if let Some(idx) = title.find(ARTIST_SEPARATORS) {
        return title[..idx].trim().to_lowercase();
    }

    if let Some(caps) = FEATURING_MARKER.captures(title) {
        return caps[1].trim().to_lowercase();
    }

    title.to_lowercase()
}

/// Registry of claimed titles for a single run
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    claims: Mutex<HashMap<ClaimScope, HashSet<String>>>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single insert, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<ClaimScope, HashSet<String>>> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically claim `normalized_title` within `scope`
    ///
    /// Returns true only for the first call with a given pair. A `PerLine`
    /// scope refuses every claim after its first one, whatever the title.
    pub fn try_claim(&self, scope: &ClaimScope, normalized_title: &str) -> bool {
        let mut claims = self.lock();
        let titles = claims.entry(scope.clone()).or_default();

        if matches!(scope, ClaimScope::PerLine(_)) && !titles.is_empty() {
            return false;
        }

        titles.insert(normalized_title.to_string())
    }

    /// Whether the pair has been claimed
    pub fn is_claimed(&self, scope: &ClaimScope, normalized_title: &str) -> bool {
        self.lock()
            .get(scope)
            .map(|titles| titles.contains(normalized_title))
            .unwrap_or(false)
    }

    /// Titles claimed within one scope, sorted
    pub fn claimed_titles(&self, scope: &ClaimScope) -> Vec<String> {
        let mut titles: Vec<String> = self
            .lock()
            .get(scope)
            .map(|titles| titles.iter().cloned().collect())
            .unwrap_or_default();
        titles.sort();
        titles
    }

    /// Total number of claims across all scopes
    pub fn total_claims(&self) -> usize {
        self.lock().values().map(HashSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_artist_key_from_separator() {
        assert_eq!(extract_artist_key("Imagine Dragons - Believer"), "imagine dragons");
        assert_eq!(extract_artist_key("Coldplay – Yellow (Official Video)"), "coldplay");
        assert_eq!(extract_artist_key("Coldplay | Fix You"), "coldplay");
        // First separator wins
        assert_eq!(extract_artist_key("AC-DC - Thunderstruck"), "ac");
    }

    #[test]
    fn test_artist_key_from_featuring_marker() {
        assert_eq!(extract_artist_key("Anitta feat. Cardi B Downtown"), "anitta");
        assert_eq!(extract_artist_key("Drake ft Rihanna Too Good"), "drake");
        assert_eq!(extract_artist_key("Ivete Sangalo com Criolo Vale"), "ivete sangalo");
        assert_eq!(extract_artist_key("Sia FEAT Sean Paul Cheap Thrills"), "sia");
    }

    #[test]
    fn test_artist_key_falls_back_to_title() {
        assert_eq!(extract_artist_key("Bohemian Rhapsody"), "bohemian rhapsody");
        // "com" must be a separate word
        assert_eq!(extract_artist_key("Welcome Home"), "welcome home");
    }

    #[test]
    fn test_artist_scope_one_claim_per_title() {
        let registry = ClaimRegistry::new();
        let scope = ClaimScope::PerArtist("coldplay".to_string());

        assert!(registry.try_claim(&scope, "coldplay - yellow"));
        assert!(!registry.try_claim(&scope, "coldplay - yellow"));
        assert!(registry.try_claim(&scope, "coldplay - fix you"));
        assert_eq!(registry.claimed_titles(&scope).len(), 2);
    }

    #[test]
    fn test_line_scope_caps_at_one() {
        let registry = ClaimRegistry::new();
        let scope = ClaimScope::PerLine(3);

        assert!(registry.try_claim(&scope, "believer"));
        assert!(!registry.try_claim(&scope, "believer (live)"));
        assert!(!registry.try_claim(&scope, "believer"));
        assert_eq!(registry.claimed_titles(&scope), vec!["believer".to_string()]);
    }

    #[test]
    fn test_scopes_are_independent() {
        let registry = ClaimRegistry::new();

        assert!(registry.try_claim(&ClaimScope::PerLine(1), "believer"));
        assert!(registry.try_claim(&ClaimScope::PerLine(2), "believer"));
        assert!(registry.try_claim(&ClaimScope::PerArtist("imagine dragons".into()), "believer"));
        assert_eq!(registry.total_claims(), 3);
        assert!(registry.is_claimed(&ClaimScope::PerLine(2), "believer"));
        assert!(!registry.is_claimed(&ClaimScope::PerLine(4), "believer"));
    }

    #[test]
    fn test_concurrent_claims_have_single_winner() {
        const WORKERS: usize = 16;
        let registry = Arc::new(ClaimRegistry::new());
        let barrier = Arc::new(Barrier::new(WORKERS));
        let scope = ClaimScope::PerArtist("queen".to_string());

        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                let registry = registry.clone();
                let barrier = barrier.clone();
                let scope = scope.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    registry.try_claim(&scope, "queen - bohemian rhapsody")
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }
}
