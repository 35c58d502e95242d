//! Media resolver interface
//!
//! The resolver turns a query string into candidate track metadata. Search,
//! extraction and network details belong to the implementation; the engine
//! only sees [`ResolvedResult`].

use crate::error::ResolutionError;
use crate::types::Candidate;
use async_trait::async_trait;

/// Shape of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedResult {
    /// One track (e.g. a direct video URL)
    SingleTrack(Candidate),
    /// Search hits
    FlatList(Vec<Candidate>),
    /// Named playlist; the title is used for reporting only
    Playlist { title: String, tracks: Vec<Candidate> },
}

impl ResolvedResult {
    /// Flatten into a candidate list, plus the playlist title if any
    pub fn into_candidates(self) -> (Vec<Candidate>, Option<String>) {
        match self {
            ResolvedResult::SingleTrack(candidate) => (vec![candidate], None),
            ResolvedResult::FlatList(candidates) => (candidates, None),
            ResolvedResult::Playlist { title, tracks } => {
                let tracks = tracks
                    .into_iter()
                    .map(|mut c| {
                        c.source_entry_playlist = true;
                        c
                    })
                    .collect();
                (tracks, Some(title))
            }
        }
    }
}

/// Resolves a query into candidate tracks
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolver name for logs
    fn name(&self) -> &'static str;

    /// Resolve a query string (URL or `ytsearchN:` search)
    async fn resolve(&self, query: &str) -> Result<ResolvedResult, ResolutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_track_flattens() {
        let (candidates, playlist) =
            ResolvedResult::SingleTrack(Candidate::new("Believer")).into_candidates();
        assert_eq!(candidates.len(), 1);
        assert!(playlist.is_none());
        assert!(!candidates[0].source_entry_playlist);
    }

    #[test]
    fn test_playlist_marks_tracks() {
        let (candidates, playlist) = ResolvedResult::Playlist {
            title: "Road Trip".to_string(),
            tracks: vec![Candidate::new("A"), Candidate::new("B")],
        }
        .into_candidates();
        assert_eq!(playlist.as_deref(), Some("Road Trip"));
        assert!(candidates.iter().all(|c| c.source_entry_playlist));
    }
}
