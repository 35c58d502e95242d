//! Test Helper Utilities
//!
//! In-memory resolver and filesystem-backed fake downloader for driving the
//! engine without yt-dlp.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tunefetch::{
    Candidate, DownloadError, Downloader, EngineConfig, MediaResolver, ResolutionError,
    ResolvedResult,
};

/// Canned resolver response
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Resolved(ResolvedResult),
    Error(String),
    Panic,
}

/// Resolver answering from a query → response map
#[derive(Debug, Default)]
pub struct FakeResolver {
    responses: HashMap<String, FakeResponse>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, response: ResolvedResult) -> Self {
        self.responses
            .insert(query.to_string(), FakeResponse::Resolved(response));
        self
    }

    pub fn with_search(self, query: &str, titles: &[&str]) -> Self {
        let tracks = titles.iter().map(|t| track(t)).collect();
        self.with(query, ResolvedResult::FlatList(tracks))
    }

    pub fn with_error(mut self, query: &str, error: &str) -> Self {
        self.responses
            .insert(query.to_string(), FakeResponse::Error(error.to_string()));
        self
    }

    pub fn with_panic(mut self, query: &str) -> Self {
        self.responses.insert(query.to_string(), FakeResponse::Panic);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaResolver for FakeResolver {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(&self, query: &str) -> Result<ResolvedResult, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(query) {
            Some(FakeResponse::Resolved(result)) => Ok(result.clone()),
            Some(FakeResponse::Error(error)) => Err(ResolutionError::Failed(error.clone())),
            Some(FakeResponse::Panic) => panic!("resolver exploded on {}", query),
            None => Err(ResolutionError::Failed(format!("no fake for {}", query))),
        }
    }
}

/// Downloader that writes `<title>.mp3` into the destination
#[derive(Debug, Default)]
pub struct FakeDownloader {
    failing: HashSet<String>,
    delay: Option<Duration>,
    fetched: std::sync::Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Titles passed to `fetch`, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch(&self, candidate: &Candidate, destination: &Path) -> Result<(), DownloadError> {
        self.fetched.lock().unwrap().push(candidate.title.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&candidate.title) {
            return Err(DownloadError::Failed(format!("HTTP 403 for {}", candidate.title)));
        }

        let path = destination.join(format!("{}.mp3", candidate.title));
        tokio::fs::write(&path, b"ID3").await?;
        Ok(())
    }
}

/// Plain search hit with a page URL
pub fn track(title: &str) -> Candidate {
    Candidate::new(title)
        .with_format("m4a")
        .with_duration(210.0)
        .with_source_url(format!("https://example.invalid/{}", title.replace(' ', "_")))
}

pub fn config_for(output_dir: &Path, threads: usize, top_n: usize) -> EngineConfig {
    EngineConfig {
        output_dir: output_dir.to_path_buf(),
        threads,
        top_n,
        ..Default::default()
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
