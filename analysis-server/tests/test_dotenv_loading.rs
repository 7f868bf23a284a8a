use std::env;
use std::fs;

use analysis_server::settings::config::Settings;
use tempfile::TempDir;

/// `.env.local` beats `.env`, the real environment beats both
#[test]
fn test_dotenv_loading_order() {
    let temp_dir = TempDir::new().unwrap();

    env::remove_var("ANALYSIS_TEST_VAR_1");
    env::remove_var("ANALYSIS_TEST_VAR_2");
    env::remove_var("ANALYSIS_TEST_VAR_3");

    fs::write(
        temp_dir.path().join(".env"),
        "ANALYSIS_TEST_VAR_1=from_env\nANALYSIS_TEST_VAR_2=from_env\nANALYSIS_TEST_VAR_3=from_env\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join(".env.local"),
        "ANALYSIS_TEST_VAR_2=from_env_local\n",
    )
    .unwrap();
    env::set_var("ANALYSIS_TEST_VAR_3", "from_environment");

    Settings::load_dotenv(temp_dir.path());

    assert_eq!(env::var("ANALYSIS_TEST_VAR_1").unwrap(), "from_env");
    assert_eq!(env::var("ANALYSIS_TEST_VAR_2").unwrap(), "from_env_local");
    assert_eq!(env::var("ANALYSIS_TEST_VAR_3").unwrap(), "from_environment");

    env::remove_var("ANALYSIS_TEST_VAR_1");
    env::remove_var("ANALYSIS_TEST_VAR_2");
    env::remove_var("ANALYSIS_TEST_VAR_3");
}

#[test]
fn test_missing_dotenv_files() {
    let temp_dir = TempDir::new().unwrap();
    Settings::load_dotenv(temp_dir.path());
}

/// The identity provider secret usually comes from an untracked `.env.local`
#[test]
fn test_auth_settings_from_dotenv() {
    let temp_dir = TempDir::new().unwrap();
    env::remove_var("ANALYSIS__AUTH__SECRET");
    env::remove_var("ANALYSIS__STORAGE__BUNDLE_BUCKET");

    fs::write(
        temp_dir.path().join(".env"),
        "ANALYSIS__AUTH__SECRET=from-env\nANALYSIS__STORAGE__BUNDLE_BUCKET=bundles\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join(".env.local"),
        "ANALYSIS__AUTH__SECRET=c2VjcmV0\n",
    )
    .unwrap();

    Settings::load_dotenv(temp_dir.path());

    let settings: Settings = config::Config::builder()
        .set_override("api.bind_address", "127.0.0.1:0")
        .unwrap()
        .add_source(Settings::get_environment())
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();

    assert_eq!(
        settings.auth.secret.as_ref().unwrap().expose_secret(),
        "c2VjcmV0"
    );
    assert_eq!(settings.storage.bundle_bucket.as_deref(), Some("bundles"));

    env::remove_var("ANALYSIS__AUTH__SECRET");
    env::remove_var("ANALYSIS__STORAGE__BUNDLE_BUCKET");
}
