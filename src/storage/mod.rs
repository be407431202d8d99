//! Storage abstractions for the watermark.
//!
//! The watermark is the timestamp of the newest post already published.
//! Posts at or below it are skipped on the next run.
//!
//! ## File Layout
//!
//! ```text
//! {install_dir}/
//! ├── config.txt            # Settings
//! └── .lotro_devtracker_ts  # Watermark, e.g. "1542813600"
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalWatermark;

/// Trait for watermark storage backends.
#[async_trait]
pub trait WatermarkStorage: Send + Sync {
    /// Last persisted watermark, or `0.0` when there is none.
    ///
    /// Read failures are not errors: a lost watermark only means the whole
    /// first page gets published again.
    async fn load(&self) -> f64;

    /// Persist a new watermark. Failing here is fatal for the run.
    async fn save(&self, watermark: f64) -> Result<()>;
}
