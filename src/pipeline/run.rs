// src/pipeline/run.rs

//! Full tracker run: fetch, scrape, publish, persist.

use chrono::Local;

use crate::error::Result;
use crate::models::{Config, RunSummary};
use crate::services::{StatusPublisher, TrackerClient, extract_cards};
use crate::storage::WatermarkStorage;

use super::publish::publish_new_posts;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave the watermark file untouched
    pub dry_run: bool,
}

/// Run the tracker once.
///
/// The watermark is written only after every card has been handled, so an
/// aborted run leaves the previous value in place.
pub async fn run_tracker(
    config: &Config,
    storage: &dyn WatermarkStorage,
    publisher: &dyn StatusPublisher,
    options: RunOptions,
) -> Result<RunSummary> {
    let watermark = storage.load().await;
    log::info!("Current watermark: {}", watermark);

    let client = TrackerClient::new(config)?;
    let page = client.fetch_page().await?;
    let cards = extract_cards(&page)?;
    log::info!("Found {} tracker cards", cards.len());

    let today = Local::now().date_naive();
    let summary = publish_new_posts(cards, watermark, config, publisher, today).await?;

    if options.dry_run {
        log::info!("Dry run, watermark not saved (would be {})", summary.watermark);
    } else {
        storage.save(summary.watermark).await?;
    }

    log::info!(
        "Published {}, duplicates {}, skipped {} of {} cards; watermark {}",
        summary.published,
        summary.duplicates,
        summary.skipped,
        summary.cards,
        summary.watermark
    );

    Ok(summary)
}
