//! devtracker CLI
//!
//! Single-shot entry point, meant to be run from cron or a systemd timer.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::DateTime;
use clap::{Parser, Subcommand};
use devtracker::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    services::{DryRunPublisher, StatusPublisher, TwitterPublisher},
    storage::{LocalWatermark, WatermarkStorage},
    utils::{self, CONFIG_FILE, WATERMARK_FILE},
};

/// devtracker - republish developer tracker posts as status updates
#[derive(Parser, Debug)]
#[command(name = "devtracker", version, about = "Developer tracker republisher")]
struct Cli {
    /// Settings file (default: config.txt next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Watermark file (default: .lotro_devtracker_ts next to the executable)
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish new tracker posts (default)
    Run {
        /// Log messages instead of publishing, and keep the watermark
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the settings file
    Validate,

    /// Show the current watermark
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let dir = utils::install_dir()?;
    let config_path = utils::resolve_path(cli.config, &dir, CONFIG_FILE);
    let storage = LocalWatermark::new(utils::resolve_path(cli.cache, &dir, WATERMARK_FILE));

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => {
            // Settings are checked before any network activity.
            let config = Config::load(&config_path)?;
            log::debug!("Loaded configuration from {}", config_path.display());

            let publisher: Box<dyn StatusPublisher> = if dry_run {
                Box::new(DryRunPublisher)
            } else {
                Box::new(TwitterPublisher::new(&config)?)
            };

            pipeline::run_tracker(&config, &storage, publisher.as_ref(), RunOptions { dry_run })
                .await?;
        }

        Command::Validate => {
            let config = Config::load(&config_path)?;
            log::info!("✓ {} OK", config_path.display());
            log::info!("Tracker: {}", config.tracker_url());
            log::info!("Max length: {}", config.max_len);
            log::info!("Status endpoint: {}", config.api_url);
        }

        Command::Info => {
            log::info!("Watermark file: {}", storage.path().display());
            let watermark = storage.load().await;
            match DateTime::from_timestamp(watermark as i64, 0) {
                Some(at) if watermark > 0.0 => {
                    log::info!("Watermark: {} ({})", watermark, at.to_rfc3339())
                }
                _ => log::info!("Watermark: {} (nothing published yet)", watermark),
            }
        }
    }

    Ok(())
}
