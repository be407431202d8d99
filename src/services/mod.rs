//! Service layer for the tracker application.
//!
//! This module contains the business logic for:
//! - Tracker fetching and card scraping (`TrackerClient`, `CardExtractor`)
//! - Status message formatting (`build_message`)
//! - Status publishing (`StatusPublisher`)

pub mod message;
pub mod publisher;
mod tracker;

pub use message::build_message;
pub use publisher::{DryRunPublisher, PublishOutcome, StatusPublisher, TwitterPublisher};
pub use tracker::{CardExtractor, TrackerClient, extract_cards};
