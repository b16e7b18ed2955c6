//! Usage counters persisted to a JSON file
//!
//! Single-process store: every update rewrites the whole file under an
//! async mutex. There is no multi-writer coordination.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Errors that can occur while persisting statistics
#[derive(Error, Debug)]
pub enum StatisticsError {
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk statistics document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of `/start` commands received
    pub start_command_count: u64,
    /// Views per article link
    pub article_views: BTreeMap<String, u64>,
}

impl Statistics {
    /// Total number of article views
    #[must_use]
    pub fn total_article_views(&self) -> u64 {
        self.article_views.values().sum()
    }

    /// Most viewed articles, highest first, ties broken by key
    #[must_use]
    pub fn top_articles(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut views: Vec<(&str, u64)> = self
            .article_views
            .iter()
            .map(|(key, count)| (key.as_str(), *count))
            .collect();
        views.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        views.truncate(limit);
        views
    }
}

/// File-backed statistics store
pub struct StatisticsStore {
    path: PathBuf,
    stats: Mutex<Statistics>,
}

impl StatisticsStore {
    /// Opens the store, starting from zero if the file is missing or invalid
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stats = match Self::read(&path).await {
            Ok(Some(stats)) => {
                info!(
                    "Statistics loaded from {} (starts: {}).",
                    path.display(),
                    stats.start_command_count
                );
                stats
            }
            Ok(None) => Statistics::default(),
            Err(e) => {
                error!("Failed to load statistics: {e}");
                Statistics::default()
            }
        };

        Self {
            path,
            stats: Mutex::new(stats),
        }
    }

    async fn read(path: &Path) -> Result<Option<Statistics>, StatisticsError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counts a `/start` command and persists the result
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written. The in-memory
    /// counter is incremented regardless.
    pub async fn record_start(&self) -> Result<(), StatisticsError> {
        let mut stats = self.stats.lock().await;
        stats.start_command_count += 1;
        self.persist(&stats).await
    }

    /// Counts an article view and persists the result
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn record_article_view(&self, key: &str) -> Result<(), StatisticsError> {
        let mut stats = self.stats.lock().await;
        *stats.article_views.entry(key.to_string()).or_insert(0) += 1;
        self.persist(&stats).await
    }

    /// Copy of the current counters
    pub async fn snapshot(&self) -> Statistics {
        self.stats.lock().await.clone()
    }

    async fn persist(&self, stats: &Statistics) -> Result<(), StatisticsError> {
        let json = serde_json::to_string_pretty(stats)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Statistics saved to {}", self.path.display());
        Ok(())
    }
}
