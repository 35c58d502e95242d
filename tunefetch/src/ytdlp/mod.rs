//! yt-dlp adapters
//!
//! Concrete [`MediaResolver`](crate::resolver::MediaResolver) and
//! [`Downloader`](crate::downloader::Downloader) implementations that shell
//! out to the `yt-dlp` binary. ffmpeg must be on PATH for audio extraction.

mod downloader;
mod info;
mod resolver;

pub use downloader::YtDlpDownloader;
pub use info::InfoDict;
pub use resolver::YtDlpResolver;

use crate::error::ConfigurationError;
use std::process::Stdio;
use tokio::process::Command;

/// Check that the binary runs; returns its version string
pub async fn probe_binary(binary: &str) -> Result<String, ConfigurationError> {
    let output = Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ConfigurationError::ResolverUnavailable(format!("{}: {}", binary, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConfigurationError::ResolverUnavailable(format!(
            "{} --version exited with {:?}: {}",
            binary,
            output.status.code(),
            stderr.trim()
        )));
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    tracing::debug!(binary, version = %version, "yt-dlp available");
    Ok(version)
}

/// Last non-empty stderr line, which is where yt-dlp puts its `ERROR:` message
fn stderr_summary(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("no error output")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_missing_binary() {
        let result = probe_binary("/nonexistent/tunefetch/yt-dlp").await;
        assert!(matches!(
            result,
            Err(ConfigurationError::ResolverUnavailable(_))
        ));
    }

    #[test]
    fn test_stderr_summary_takes_last_line() {
        let stderr = b"WARNING: something\nERROR: [youtube] abc: Video unavailable\n\n";
        assert_eq!(
            stderr_summary(stderr),
            "ERROR: [youtube] abc: Video unavailable"
        );
        assert_eq!(stderr_summary(b""), "no error output");
    }
}
