use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_WORKER_PORT: u16 = 6001;

/// Settings for the in-process worker cluster started in offline mode.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClusterSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

fn default_port() -> u16 {
    DEFAULT_WORKER_PORT
}

fn default_worker_count() -> usize {
    1
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            worker_count: default_worker_count(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterSettingsError {
    /// Workers share a process-wide machine id, so only one can live in a process.
    #[error("cluster.worker_count must be 1 for the local cluster, got {0}")]
    UnsupportedWorkerCount(usize),

    #[error("cluster.port must not be 0")]
    InvalidPort,
}

impl ClusterSettings {
    pub fn validate(&self) -> Result<(), ClusterSettingsError> {
        if self.worker_count != 1 {
            return Err(ClusterSettingsError::UnsupportedWorkerCount(
                self.worker_count,
            ));
        }
        if self.port == 0 {
            return Err(ClusterSettingsError::InvalidPort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cluster_is_valid() {
        let settings = ClusterSettings::default();
        assert_eq!(settings.port, 6001);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_more_than_one_worker_is_rejected() {
        let settings = ClusterSettings {
            port: 6001,
            worker_count: 2,
        };
        assert_eq!(
            settings.validate(),
            Err(ClusterSettingsError::UnsupportedWorkerCount(2))
        );
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let settings = ClusterSettings {
            port: 6001,
            worker_count: 0,
        };
        assert!(settings.validate().is_err());
    }
}
