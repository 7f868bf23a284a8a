//! Transit feed cache.
//!
//! Feeds are unpacked below `{local_cache}/gtfs`. Offline deployments only
//! ever read that directory; networked deployments fill it from the bundle
//! bucket on demand.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::info;

pub const FEED_DIRECTORY: &str = "gtfs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Local,
    Bucket(String),
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Local => f.write_str("local"),
            FeedSource::Bucket(name) => write!(f, "bucket:{name}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedCacheError {
    #[error("storage.bundle_bucket must be set when running networked")]
    MissingBucket,

    #[error("Could not prepare feed cache directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feed id: {0:?}")]
    InvalidFeedId(String),
}

#[derive(Debug, Clone)]
pub struct FeedCache {
    source: FeedSource,
    directory: PathBuf,
}

impl FeedCache {
    pub async fn initialize(source: FeedSource, cache_dir: &Path) -> Result<Self, FeedCacheError> {
        if let FeedSource::Bucket(name) = &source {
            if name.trim().is_empty() {
                return Err(FeedCacheError::MissingBucket);
            }
        }

        let directory = cache_dir.join(FEED_DIRECTORY);
        fs::create_dir_all(&directory)
            .await
            .map_err(|source| FeedCacheError::Directory {
                path: directory.clone(),
                source,
            })?;

        info!(source = %source, path = %directory.display(), "Feed cache initialized");
        Ok(Self { source, directory })
    }

    /// Where feeds come from, for status output.
    pub fn location(&self) -> String {
        match &self.source {
            FeedSource::Local => self.directory.display().to_string(),
            FeedSource::Bucket(name) => format!("bucket://{name}"),
        }
    }

    pub fn feed_path(&self, feed_id: &str) -> Result<PathBuf, FeedCacheError> {
        let valid = !feed_id.is_empty()
            && feed_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !feed_id.starts_with('.');
        if !valid {
            return Err(FeedCacheError::InvalidFeedId(feed_id.to_string()));
        }
        Ok(self.directory.join(feed_id))
    }
}
