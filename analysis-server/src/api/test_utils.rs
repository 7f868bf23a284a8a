//! Shared helpers for the router and startup tests.

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use config::Config;

use analysis_core::auth::AuthorizationGate;

use crate::api::router::ApiRoutes;
use crate::app_state::{AppState, SharedAppState};
use crate::bootstrap::build_gate;
use crate::feed_cache::{FeedCache, FeedSource};
use crate::persistence::Persistence;
use crate::settings::config::Settings;
use crate::static_files::SpaDocument;
use crate::stop_flag::StopFlag;

pub const TEST_SECRET: &str = "dGVzdC1zaWduaW5nLXNlY3JldA";
pub const TEST_SECRET_BYTES: &[u8] = b"test-signing-secret";
pub const TEST_CLIENT_ID: &str = "test-client";

/// Any port that was free a moment ago.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Settings rooted in `dir` with an ephemeral bind address, plus overrides.
pub fn settings_for(offline: bool, dir: &Path, overrides: &[(&str, &str)]) -> Settings {
    let mut builder = Config::builder()
        .set_override("offline", offline)
        .unwrap()
        .set_override("api.bind_address", "127.0.0.1:0")
        .unwrap()
        .set_override(
            "storage.local_cache",
            dir.join("cache").display().to_string(),
        )
        .unwrap()
        .set_override("storage.database_dir", dir.join("db").display().to_string())
        .unwrap();

    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }

    builder.build().unwrap().try_deserialize().unwrap()
}

/// Networked settings wired to the shared test secret.
pub fn networked_settings(dir: &Path) -> Settings {
    settings_for(
        false,
        dir,
        &[
            ("auth.secret", TEST_SECRET),
            ("auth.client_id", TEST_CLIENT_ID),
            ("storage.bundle_bucket", "analysis-bundles"),
        ],
    )
}

pub async fn create_test_app_state(settings: Settings, gate: AuthorizationGate) -> SharedAppState {
    let persistence = Persistence::initialize(&settings.storage).await.unwrap();
    let feed_cache = FeedCache::initialize(FeedSource::Local, &settings.storage.local_cache)
        .await
        .unwrap();
    let spa = SpaDocument::load(&settings.api.asset_location).unwrap();

    Arc::new(AppState {
        settings,
        gate,
        persistence,
        feed_cache: Arc::new(feed_cache),
        cluster: None,
        spa,
        stop_flag: StopFlag::new(),
    })
}

pub async fn create_test_server(settings: Settings) -> TestServer {
    let gate = build_gate(&settings).unwrap();
    let app_state = create_test_app_state(settings, gate).await;
    TestServer::new(ApiRoutes::create(app_state)).unwrap()
}

/// An HS256 token for the test secret and client id carrying `claims`.
pub fn mint_token(mut claims: serde_json::Value) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    if let Some(map) = claims.as_object_mut() {
        map.entry("aud")
            .or_insert_with(|| serde_json::Value::from(TEST_CLIENT_ID));
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET_BYTES),
    )
    .unwrap()
}
