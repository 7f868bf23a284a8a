//! Document persistence.
//!
//! Each collection is a directory below `storage.database_dir`, each
//! document a pretty printed JSON file named after its id. Writes go to a
//! temporary file first and are renamed into place.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use analysis_core::settings::storage::StorageSettings;

const WRITE_PROBE: &str = ".write-probe";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document could not be (de)serialized: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid collection or document id: {0:?}")]
    InvalidKey(String),
}

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T, StorageError>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T, StorageError> {
        self.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Persistence {
    root: PathBuf,
}

impl Persistence {
    /// Open the store, creating the database directory and checking that it
    /// is writable.
    pub async fn initialize(settings: &StorageSettings) -> Result<Self, StorageError> {
        let root = settings.database_dir.clone();
        fs::create_dir_all(&root).await.at(&root)?;

        let probe = root.join(WRITE_PROBE);
        fs::write(&probe, b"ok").await.at(&probe)?;
        fs::remove_file(&probe).await.at(&probe)?;

        debug!(path = %root.display(), "document store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), StorageError> {
        let dir = self.collection_dir(collection)?;
        fs::create_dir_all(&dir).await.at(&dir)?;

        let path = self.document_path(collection, id)?;
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_vec_pretty(document)?;
        fs::write(&tmp, contents).await.at(&tmp)?;
        fs::rename(&tmp, &path).await.at(&path)?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        let path = self.document_path(collection, id)?;
        match fs::read(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).at(&path),
        }
    }

    /// All documents of a collection. Unreadable documents are skipped with a warning.
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StorageError> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).at(&dir),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await.at(&dir)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = fs::read(&path).await.at(&path)?;
            match serde_json::from_slice(&contents) {
                Ok(document) => documents.push(document),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable document: {}", e),
            }
        }
        Ok(documents)
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        let path = self.document_path(collection, id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).at(&path),
        }
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StorageError> {
        validate_key(collection)?;
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, StorageError> {
        validate_key(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{id}.json")))
    }
}

/// Keys become path components, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
