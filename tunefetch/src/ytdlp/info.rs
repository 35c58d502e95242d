//! yt-dlp info dictionary
//!
//! Subset of the JSON printed by `yt-dlp --dump-single-json`. Every field is
//! optional; yt-dlp omits or nulls whatever the extractor did not find.

use crate::resolver::ResolvedResult;
use crate::types::{Candidate, UNKNOWN_TITLE};
use serde::Deserialize;

const PLAYLIST_TYPE: &str = "playlist";
const UNKNOWN_PLAYLIST: &str = "Unknown Playlist";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoDict {
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub ext: Option<String>,
    pub webpage_url: Option<String>,
    pub url: Option<String>,
    /// Playlist and search entries; unavailable videos come back as null
    pub entries: Option<Vec<Option<InfoDict>>>,
}

impl InfoDict {
    pub fn is_playlist(&self) -> bool {
        self.kind.as_deref() == Some(PLAYLIST_TYPE) || self.entries.is_some()
    }

    /// Candidate for a single video entry
    pub fn to_candidate(&self) -> Candidate {
        let mut candidate = Candidate::new(
            self.title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        )
        .with_format(self.ext.clone().unwrap_or_default());

        candidate.duration_seconds = self.duration;
        candidate.view_count = self.view_count;
        candidate.source_url = self.webpage_url.clone().or_else(|| self.url.clone());
        candidate
    }

    fn entry_candidates(&self) -> Vec<Candidate> {
        self.entries
            .iter()
            .flatten()
            .flatten()
            .map(InfoDict::to_candidate)
            .collect()
    }

    /// Map onto the engine's result shapes
    ///
    /// A search query always yields a flat list, any other playlist keeps its
    /// title, everything else is a single track.
    pub fn into_resolved(self, is_search: bool) -> ResolvedResult {
        if !self.is_playlist() {
            return ResolvedResult::SingleTrack(self.to_candidate());
        }

        let tracks = self.entry_candidates();
        if is_search {
            ResolvedResult::FlatList(tracks)
        } else {
            ResolvedResult::Playlist {
                title: self.title.unwrap_or_else(|| UNKNOWN_PLAYLIST.to_string()),
                tracks,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
        "_type": "playlist",
        "id": "Coldplay",
        "title": "Coldplay",
        "entries": [
            {"title": "Coldplay - Yellow (Official Video)", "duration": 269.0,
             "view_count": 1500000000, "ext": "webm",
             "webpage_url": "https://www.youtube.com/watch?v=yKNxeF4KMsY"},
            null,
            {"duration": 301.5, "ext": "m4a", "url": "https://example.invalid/a"}
        ]
    }"#;

    #[test]
    fn test_search_result_is_flat_list() {
        let info: InfoDict = serde_json::from_str(SEARCH_JSON).unwrap();
        match info.into_resolved(true) {
            ResolvedResult::FlatList(tracks) => {
                assert_eq!(tracks.len(), 2);
                assert_eq!(tracks[0].title, "Coldplay - Yellow (Official Video)");
                assert_eq!(tracks[0].view_count, Some(1_500_000_000));
                assert_eq!(tracks[0].format_hint, "webm");
                assert_eq!(
                    tracks[0].source_url.as_deref(),
                    Some("https://www.youtube.com/watch?v=yKNxeF4KMsY")
                );
                // Missing title and webpage_url fall back
                assert_eq!(tracks[1].title, "Unknown");
                assert_eq!(tracks[1].source_url.as_deref(), Some("https://example.invalid/a"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_url_playlist_keeps_title() {
        let info: InfoDict = serde_json::from_str(SEARCH_JSON).unwrap();
        match info.into_resolved(false) {
            ResolvedResult::Playlist { title, tracks } => {
                assert_eq!(title, "Coldplay");
                assert_eq!(tracks.len(), 2);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_single_video() {
        let info: InfoDict = serde_json::from_str(
            r#"{"_type": "video", "title": "Queen - Bohemian Rhapsody", "duration": 355,
                "view_count": null, "ext": "webm", "webpage_url": "https://youtu.be/fJ9rUzIMcZQ",
                "formats": [{"format_id": "251"}]}"#,
        )
        .unwrap();

        match info.into_resolved(false) {
            ResolvedResult::SingleTrack(candidate) => {
                assert_eq!(candidate.title, "Queen - Bohemian Rhapsody");
                assert_eq!(candidate.duration_seconds, Some(355.0));
                assert!(candidate.view_count.is_none());
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_search() {
        let info: InfoDict =
            serde_json::from_str(r#"{"_type": "playlist", "entries": []}"#).unwrap();
        assert_eq!(info.into_resolved(true), ResolvedResult::FlatList(Vec::new()));
    }
}
