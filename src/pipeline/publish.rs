// src/pipeline/publish.rs

//! Publishing pass over scraped tracker cards.

use std::time::Duration;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Config, RunSummary, TrackerCard};
use crate::services::{PublishOutcome, StatusPublisher, build_message};

/// Publish every card newer than `watermark`, oldest first.
///
/// `cards` are in page order (newest first). The returned summary carries
/// the advanced watermark; the caller decides whether to persist it. The
/// first malformed card aborts the pass, even if earlier cards were already
/// published.
pub async fn publish_new_posts(
    cards: Vec<TrackerCard>,
    watermark: f64,
    config: &Config,
    publisher: &dyn StatusPublisher,
    today: NaiveDate,
) -> Result<RunSummary> {
    let delay = Duration::from_millis(config.publish_delay_ms);
    let mut summary = RunSummary {
        cards: cards.len(),
        watermark,
        ..RunSummary::default()
    };

    for card in cards.into_iter().rev() {
        let post = card.into_post(today)?;

        if post.timestamp <= summary.watermark {
            log::debug!(
                "Skipping \"{}\" ({} <= watermark {})",
                post.title,
                post.timestamp,
                summary.watermark
            );
            summary.skipped += 1;
            continue;
        }

        let message = build_message(&post, config)?;
        log::info!("Publishing: {}", message);

        match publisher.publish(&message).await? {
            PublishOutcome::Posted => summary.published += 1,
            PublishOutcome::Duplicate => summary.duplicates += 1,
        }
        summary.watermark = post.timestamp;

        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(summary)
}
