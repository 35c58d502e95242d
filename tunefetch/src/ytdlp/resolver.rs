use super::info::InfoDict;
use super::stderr_summary;
use crate::error::ResolutionError;
use crate::query::SEARCH_PREFIX;
use crate::resolver::{MediaResolver, ResolvedResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Resolves queries with `yt-dlp --dump-single-json`
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    binary: String,
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl MediaResolver for YtDlpResolver {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, query: &str) -> Result<ResolvedResult, ResolutionError> {
        let output = Command::new(&self.binary)
            .args(["--dump-single-json", "--no-warnings", "--ignore-errors"])
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        // --ignore-errors still exits non-zero when some playlist items failed,
        // so only give up when nothing was printed
        if output.stdout.is_empty() {
            return Err(ResolutionError::Failed(stderr_summary(&output.stderr)));
        }

        let info: InfoDict = serde_json::from_slice(&output.stdout)
            .map_err(|e| ResolutionError::InvalidOutput(e.to_string()))?;

        if !output.status.success() {
            tracing::debug!(
                query,
                stderr = %stderr_summary(&output.stderr),
                "yt-dlp reported partial failure"
            );
        }

        let is_search = query.to_lowercase().starts_with(SEARCH_PREFIX);
        Ok(info.into_resolved(is_search))
    }
}
