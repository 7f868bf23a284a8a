use analysis_core::settings::{
    api_server::ApiServer, auth::AuthSettings, cluster::ClusterSettings, storage::StorageSettings,
};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::Path};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Default log level `debug` instead of `info` when `RUST_LOG` is unset.
    #[serde(default)]
    pub debug: bool,
    /// Single tenant mode: no token checks, local feed cache, in-process workers.
    #[serde(default)]
    pub offline: bool,
    pub telemetry: Option<String>,
    pub api: ApiServer,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub cluster: ClusterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            offline: false,
            telemetry: None,
            api: ApiServer::default(),
            auth: AuthSettings::default(),
            storage: StorageSettings::default(),
            cluster: ClusterSettings::default(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("ANALYSIS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Load `.env.local` and `.env` from `dir`. Variables that are already
    /// set win, and `.env.local` wins over `.env`.
    pub fn load_dotenv(dir: &Path) {
        dotenvy::from_path(dir.join(".env.local")).ok();
        dotenvy::from_path(dir.join(".env")).ok();
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("ANALYSIS_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("offline", false)?
            .set_default("api.bind_address", "0.0.0.0:7070")?
            .set_default("api.api_prefix", "/api")?
            .set_default("api.asset_location", "")?
            .set_default("storage.local_cache", "cache")?
            .set_default("storage.database_dir", "cache/db")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.telemetry = settings.check_if_optional(&settings.telemetry);

        Ok(settings)
    }

    /// Telemetry can be switched off from the environment even when a
    /// config file enables it.
    fn check_if_optional(&self, s: &Option<String>) -> Option<String> {
        match s {
            None => None,
            Some(s) => match s.to_lowercase().as_str() {
                "no" | "false" | "0" | "" => None,
                _ => Some(s.to_string()),
            },
        }
    }

    pub fn traces_enabled(&self) -> bool {
        self.telemetry
            .as_ref()
            .map(|settings| settings.to_lowercase().split(',').any(|s| s == "traces"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn from_test_file() -> Config {
        Config::builder()
            .add_source(config::File::with_name("tests/test_settings"))
            .add_source(Settings::get_environment())
            .build()
            .unwrap()
    }

    #[test]
    fn test_settings_from_file() {
        let settings: Settings = Config::builder()
            .add_source(config::File::with_name("tests/test_settings"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!settings.offline);
        assert_eq!(settings.api.bind_address, "127.0.0.1:7171");
        assert_eq!(settings.api.asset_location, "https://assets.example.com/v1");
        assert_eq!(settings.auth.client_id.as_deref(), Some("test-client"));
        assert_eq!(
            settings.auth.secret.as_ref().unwrap().expose_secret(),
            "dGVzdC1zaWduaW5nLXNlY3JldA"
        );
        assert_eq!(settings.auth.leeway_seconds, 60);
        assert_eq!(
            settings.storage.bundle_bucket.as_deref(),
            Some("analysis-bundles")
        );
        assert_eq!(settings.cluster.port, 6001);
    }

    #[test]
    fn test_shipped_defaults_are_networked() {
        let settings: Settings = Config::builder()
            .add_source(config::File::with_name("../config/default"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!settings.offline);
        assert!(!settings.debug);
        assert_eq!(settings.telemetry.as_deref(), Some("no"));
        assert_eq!(settings.api.api_prefix, "/api");
    }

    #[test]
    fn test_client_id_from_env() {
        env::set_var("ANALYSIS__AUTH__CLIENT_ID", "env-client");

        let settings: Settings = from_test_file().try_deserialize().unwrap();
        assert_eq!(settings.auth.client_id.as_deref(), Some("env-client"));

        env::remove_var("ANALYSIS__AUTH__CLIENT_ID");
    }

    #[test]
    fn test_secret_is_masked_in_debug_output() {
        let settings: Settings = Config::builder()
            .add_source(config::File::with_name("tests/test_settings"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let printed = format!("{:?}", settings);
        assert!(!printed.contains("dGVzdC1zaWduaW5nLXNlY3JldA"));
    }

    #[test]
    fn test_telemetry_can_be_disabled() {
        let settings = Settings::default();
        for value in ["no", "false", "0", "FALSE"] {
            assert_eq!(settings.check_if_optional(&Some(value.to_string())), None);
        }
        assert_eq!(
            settings.check_if_optional(&Some("traces".to_string())),
            Some("traces".to_string())
        );
    }

    #[test]
    fn test_traces_enabled() {
        let mut settings = Settings::default();
        assert!(!settings.traces_enabled());
        settings.telemetry = Some("metrics,Traces".to_string());
        assert!(settings.traces_enabled());
    }
}
