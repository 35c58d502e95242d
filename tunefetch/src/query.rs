//! Resolver query construction

use crate::entry::{Entry, EntryKind};

/// Search prefix understood by the resolver
pub const SEARCH_PREFIX: &str = "ytsearch";

/// What to ask the media resolver for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    /// URL or explicit resolver query, used verbatim
    Direct(String),
    /// Free-text search limited to `max_results` hits
    Search { text: String, max_results: usize },
}

impl QuerySpec {
    /// Query string handed to the resolver
    pub fn to_query_string(&self) -> String {
        match self {
            QuerySpec::Direct(url) => url.clone(),
            QuerySpec::Search { text, max_results } => {
                format!("{}{}:{}", SEARCH_PREFIX, max_results, text)
            }
        }
    }
}

/// Build the resolver query for an entry
///
/// Specific songs ask for a single hit and trust the resolver's relevance
/// order; artists ask for `top_n` hits. `top_n` below 1 is treated as 1.
pub fn build_query(entry: &Entry, top_n: usize) -> QuerySpec {
    match entry.kind {
        EntryKind::DirectUrl => QuerySpec::Direct(entry.raw_text.clone()),
        EntryKind::SpecificSong => QuerySpec::Search {
            text: entry.raw_text.clone(),
            max_results: 1,
        },
        EntryKind::ArtistQuery => QuerySpec::Search {
            text: entry.raw_text.clone(),
            max_results: top_n.max(1),
        },
    }
}
