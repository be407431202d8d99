// src/models/mod.rs

//! Domain models for the tracker application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod config;
mod post;
mod selectors;

// Re-export all public types
pub use config::{Config, Credentials};
pub use post::{Post, TrackerCard};
pub use selectors::TrackerSelectors;

/// Counters for a single tracker run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Cards found on the tracker page
    pub cards: usize,
    /// Posts accepted by the status endpoint
    pub published: usize,
    /// Posts the endpoint reported as already published
    pub duplicates: usize,
    /// Posts at or below the watermark
    pub skipped: usize,
    /// Watermark after the run
    pub watermark: f64,
}
