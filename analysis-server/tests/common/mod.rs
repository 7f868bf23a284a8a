#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use config::Config;

use analysis_core::auth::AuthorizationGate;
use analysis_server::api::router::ApiRoutes;
use analysis_server::app_state::{AppState, SharedAppState};
use analysis_server::feed_cache::{FeedCache, FeedSource};
use analysis_server::persistence::Persistence;
use analysis_server::settings::config::Settings;
use analysis_server::static_files::SpaDocument;
use analysis_server::stop_flag::StopFlag;

pub const TEST_SECRET: &str = "dGVzdC1zaWduaW5nLXNlY3JldA";
pub const TEST_SECRET_BYTES: &[u8] = b"test-signing-secret";
pub const TEST_CLIENT_ID: &str = "test-client";

pub fn settings(offline: bool, dir: &Path) -> Settings {
    Config::builder()
        .set_override("offline", offline)
        .unwrap()
        .set_override("api.bind_address", "127.0.0.1:0")
        .unwrap()
        .set_override("auth.secret", TEST_SECRET)
        .unwrap()
        .set_override("auth.client_id", TEST_CLIENT_ID)
        .unwrap()
        .set_override(
            "storage.local_cache",
            dir.join("cache").display().to_string(),
        )
        .unwrap()
        .set_override("storage.database_dir", dir.join("db").display().to_string())
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

pub async fn app_state(settings: Settings, gate: AuthorizationGate) -> SharedAppState {
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

pub async fn server(settings: Settings, gate: AuthorizationGate) -> TestServer {
    TestServer::new(ApiRoutes::create(app_state(settings, gate).await)).unwrap()
}

pub fn mint_token(claims: serde_json::Value) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET_BYTES),
    )
    .unwrap()
}
