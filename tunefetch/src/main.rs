//! tunefetch - batch music downloader
//!
//! Reads one request per line (URL, "Artist - Title", or artist name),
//! resolves each with yt-dlp across a bounded worker pool and saves the
//! audio into the output directory without duplicating tracks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tunefetch::console::{final_summary, run_console, startup_summary};
use tunefetch::ytdlp::{probe_binary, YtDlpDownloader, YtDlpResolver};
use tunefetch::{read_entries, ConfigOverrides, Engine, EngineConfig};
use tunefetch_common::config::TomlConfig;

/// Command-line arguments for tunefetch
#[derive(Parser, Debug)]
#[command(name = "tunefetch")]
#[command(about = "Batch downloader for music from YouTube")]
#[command(version)]
struct Args {
    /// Input file, one entry per line
    #[arg(short, long, default_value = "input.txt", env = "TUNEFETCH_INPUT")]
    input: PathBuf,

    /// Destination directory (can be a flash drive) [default: output]
    #[arg(short, long, env = "TUNEFETCH_OUTPUT")]
    output: Option<PathBuf>,

    /// Simultaneous downloads [default: 4]
    #[arg(short, long, env = "TUNEFETCH_THREADS")]
    threads: Option<usize>,

    /// Songs to download per artist [default: 1]
    #[arg(long, env = "TUNEFETCH_TOP")]
    top: Option<usize>,

    /// Download even if the file already exists
    #[arg(long, env = "TUNEFETCH_FORCE")]
    force: bool,

    /// Config file (TOML)
    #[arg(short, long, env = "TUNEFETCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing (RUST_LOG wins over the config file)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = ConfigOverrides {
        output_dir: args.output,
        threads: args.threads,
        top_n: args.top,
        force: args.force,
    };
    let config = EngineConfig::resolve(&toml_config, &overrides);

    let entries = read_entries(&args.input)
        .with_context(|| format!("Failed to read input {}", args.input.display()))?;

    let version = probe_binary(&toml_config.ytdlp.binary)
        .await
        .context("yt-dlp is required (pip install --upgrade yt-dlp)")?;
    info!(binary = %toml_config.ytdlp.binary, version = %version, "Using yt-dlp");

    let engine = Engine::new(
        config,
        Arc::new(YtDlpResolver::new(&toml_config.ytdlp.binary)),
        Arc::new(YtDlpDownloader::new(&toml_config.ytdlp)),
    )
    .context("Invalid configuration")?;

    let existing = engine
        .existing_titles()
        .context("Failed to scan output directory")?;
    print!("{}", startup_summary(engine.config(), &entries, existing.len()));

    let console = tokio::spawn(run_console(engine.event_bus().subscribe()));

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, finishing in-flight entries");
            cancel.cancel();
        }
    });

    let report = engine.run(entries).await.context("Run failed")?;

    // Closing the bus ends the console task once it has drained
    drop(engine);
    let _ = console.await;

    print!("{}", final_summary(&report));
    Ok(())
}
