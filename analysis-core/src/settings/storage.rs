use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSettings {
    /// Local cache directory, created at startup if missing.
    pub local_cache: PathBuf,
    /// Root of the document store.
    pub database_dir: PathBuf,
    /// Remote bucket holding transit bundles. Required in networked mode.
    #[serde(default)]
    pub bundle_bucket: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            local_cache: PathBuf::from("cache"),
            database_dir: PathBuf::from("cache/db"),
            bundle_bucket: None,
        }
    }
}
