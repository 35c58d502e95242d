//! Console rendering
//!
//! Turns [`FetchEvent`]s into one-line progress messages and renders the
//! startup and final summaries. Tracing output goes to stderr; everything
//! here goes to stdout.

use crate::config::EngineConfig;
use crate::entry::{Entry, EntryKind};
use crate::report::{format_title_list, truncate_title, RunReport};
use tokio::sync::broadcast::{self, error::RecvError};
use tunefetch_common::events::FetchEvent;

const ENTRY_COLUMN_WIDTH: usize = 40;

/// Progress line for an event, if it is shown at all
pub fn render_event(event: &FetchEvent) -> Option<String> {
    match event {
        FetchEvent::EntryStarted {
            line_id, kind, text, ..
        } => Some(format!("Processing: ({}) {} {}", line_id, kind, text)),
        FetchEvent::CandidateSkipped {
            line_id,
            title,
            reason,
            ..
        } => Some(format!(
            "⚠ ({}) Skipping: {} ({})",
            line_id,
            title,
            reason.describe()
        )),
        FetchEvent::PlaylistSelected {
            line_id,
            playlist_title,
            selected,
            total,
            preview,
            ..
        } => {
            let shown: Vec<&str> = preview.iter().map(String::as_str).collect();
            let mut line = format!(
                "ℹ ({}) Selected {} of {} items from playlist {}: {}",
                line_id,
                selected,
                total,
                playlist_title,
                format_title_list(&shown)
            );
            if *selected > preview.len() {
                line.push_str(&format!(" and {} more item(s)", selected - preview.len()));
            }
            Some(line)
        }
        FetchEvent::DownloadSucceeded { line_id, title, .. } => {
            Some(format!("✓ ({}) Downloaded: {}", line_id, title))
        }
        FetchEvent::DownloadFailed {
            line_id,
            title,
            error,
            ..
        } => Some(format!("✗ ({}) Failed to download {}: {}", line_id, title, error)),
        FetchEvent::EntryFailed {
            line_id,
            text,
            error,
            ..
        } => Some(format!("✗ ({}) Failed to process '{}': {}", line_id, text, error)),
        FetchEvent::EntryCompleted {
            line_id,
            text,
            downloads,
            failed,
            cancelled,
            completed,
            total,
            ..
        } => {
            let progress = format!("[{}/{}] entries processed", completed, total);
            if *downloads == 0 && !failed && !cancelled {
                Some(format!(
                    "⚠ ({}) No new songs downloaded for: {}\n{}",
                    line_id, text, progress
                ))
            } else {
                Some(progress)
            }
        }
        FetchEvent::RunStarted { .. } | FetchEvent::RunCompleted { .. } => None,
    }
}

/// Print events until the bus is dropped
pub async fn run_console(mut rx: broadcast::Receiver<FetchEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = render_event(&event) {
                    println!("{}", line);
                }
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Console fell behind, progress lines dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Configuration table shown before the run starts
pub fn startup_summary(config: &EngineConfig, entries: &[Entry], existing: usize) -> String {
    let songs = entries
        .iter()
        .filter(|e| e.kind == EntryKind::SpecificSong)
        .count();
    let urls = entries
        .iter()
        .filter(|e| e.kind == EntryKind::DirectUrl)
        .count();
    let artists = entries.len() - songs - urls;

    let rows = [
        ("Input entries", format!("{}", entries.len())),
        ("Specific songs", songs.to_string()),
        ("Artists", artists.to_string()),
        ("URLs", urls.to_string()),
        ("Songs per artist", config.top_n.to_string()),
        ("Simultaneous downloads", config.threads.to_string()),
        ("Output directory", config.output_dir.display().to_string()),
        ("Files already present", existing.to_string()),
        (
            "Force re-download",
            if config.force { "yes" } else { "no" }.to_string(),
        ),
    ];

    let mut out = String::from("Download configuration\n");
    for (label, value) in rows {
        out.push_str(&format!("  {:<24}{}\n", label, value));
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let shown = truncate_title(text);
    let len = shown.chars().count();
    if len >= width {
        shown
    } else {
        format!("{}{}", shown, " ".repeat(width - len))
    }
}

/// Per-line table and totals shown after the run
pub fn final_summary(report: &RunReport) -> String {
    let mut out = String::from("Download summary\n");
    out.push_str(&format!(
        "  {:>5}  {:<7}{}  {}\n",
        "Line",
        "Type",
        pad("Entry", ENTRY_COLUMN_WIDTH),
        "Downloads"
    ));

    for entry in &report.entries {
        let cell = if entry.cancelled {
            "cancelled".to_string()
        } else if let Some(error) = &entry.error {
            format!("0 (failed: {})", error)
        } else {
            entry.summary_cell()
        };

        out.push_str(&format!(
            "  {:>5}  {:<7}{}  {}\n",
            entry.line_id,
            entry.kind.label(),
            pad(&entry.text, ENTRY_COLUMN_WIDTH),
            cell
        ));
    }

    let elapsed = report.elapsed.as_secs();
    out.push_str(&format!(
        "\nCompleted in {}m {}s: {} new file(s), {} confirmed download(s), {} failed, in {}\n",
        elapsed / 60,
        elapsed % 60,
        report.new_files,
        report.confirmed_downloads,
        report.failed_downloads,
        report.output_dir.display()
    ));
    out
}
