//! Local filesystem watermark storage.
//!
//! The file holds one decimal number. Writes go to a temp file that is
//! then renamed over the original, so a crash never leaves a torn value.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::WatermarkStorage;

/// Watermark kept in a plain-text file.
#[derive(Debug, Clone)]
pub struct LocalWatermark {
    path: PathBuf,
}

impl LocalWatermark {
    /// Create a watermark store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the watermark file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse file content, falling back to zero.
    fn parse(content: &str) -> f64 {
        content
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await
    }
}

#[async_trait]
impl WatermarkStorage for LocalWatermark {
    async fn load(&self) -> f64 {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let watermark = Self::parse(&content);
                log::debug!("Loaded watermark {} from {}", watermark, self.path.display());
                watermark
            }
            Err(e) => {
                log::warn!(
                    "No usable watermark at {} ({}), starting from 0",
                    self.path.display(),
                    e
                );
                0.0
            }
        }
    }

    async fn save(&self, watermark: f64) -> Result<()> {
        self.write_bytes(watermark.to_string().as_bytes())
            .await
            .map_err(|e| AppError::storage(&self.path, e))?;
        log::debug!("Saved watermark {} to {}", watermark, self.path.display());
        Ok(())
    }
}
