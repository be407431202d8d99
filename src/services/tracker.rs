// src/services/tracker.rs

//! Developer tracker service.
//!
//! Fetches the tracker listing and scrapes its post cards.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Config, TrackerCard, TrackerSelectors};
use crate::utils::http;
use crate::utils::normalize_whitespace;

/// Service for reading the developer tracker.
pub struct TrackerClient {
    url: String,
    client: Client,
}

impl TrackerClient {
    /// Create a tracker client for the configured forum.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            url: config.tracker_url(),
            client: http::create_async_client(config)?,
        })
    }

    /// Fetch the raw tracker listing.
    pub async fn fetch_page(&self) -> Result<String> {
        log::info!("Fetching {}", self.url);
        let body = http::fetch_text(&self.client, &self.url).await?;
        log::debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

/// Scrapes tracker cards out of a listing page.
pub struct CardExtractor {
    selectors: TrackerSelectors,
    card_sel: Selector,
    link_sel: Selector,
    status_sel: Selector,
}

impl CardExtractor {
    /// Compile the given selectors.
    pub fn new(selectors: TrackerSelectors) -> Result<Self> {
        Ok(Self {
            card_sel: parse_selector(&selectors.card_selector)?,
            link_sel: parse_selector(&selectors.link_selector)?,
            status_sel: parse_selector(&selectors.status_selector)?,
            selectors,
        })
    }

    /// All cards on the page, in document order (newest first).
    pub fn extract(&self, html: &str) -> Vec<TrackerCard> {
        let document = Html::parse_document(html);
        document
            .select(&self.card_sel)
            .map(|card| self.parse_card(&card))
            .collect()
    }

    fn parse_card(&self, card: &ElementRef) -> TrackerCard {
        let mut parsed = TrackerCard {
            html: card.html(),
            ..TrackerCard::default()
        };

        // Later links win; icons linking to first/last post match neither marker.
        for link in card.select(&self.link_sel) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if href.contains(&self.selectors.post_link_marker) {
                parsed.url = non_empty(href.to_string());
                parsed.title = non_empty(element_text(&link));
            } else if href.contains(&self.selectors.forum_link_marker) {
                parsed.forum = non_empty(element_text(&link));
            }
        }

        if let Some(status) = card.select(&self.status_sel).last() {
            let text = element_text(&status);
            let separator = &self.selectors.author_separator;
            parsed.author = text
                .find(separator.as_str())
                .map(|pos| text[pos + separator.len()..].trim_end().to_string())
                .and_then(non_empty);
            parsed.status = non_empty(text);
        }

        parsed
    }
}

/// Extract cards with the default tracker selectors.
pub fn extract_cards(html: &str) -> Result<Vec<TrackerCard>> {
    Ok(CardExtractor::new(TrackerSelectors::default())?.extract(html))
}

fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
