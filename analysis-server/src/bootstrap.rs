//! Startup sequence.
//!
//! Subsystems come up strictly one after another. The first failure aborts
//! the sequence, so the HTTP listener is only ever bound once everything it
//! depends on is ready, and requests are only served once the router is
//! complete.

use std::sync::Arc;

use anyhow::Context;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::info;

use analysis_core::auth::{
    AuthorizationGate, CredentialsError, GateMode, JwtVerifier, ProviderCredentials,
};

use crate::app_state::{AppState, SharedAppState};
use crate::cluster::LocalCluster;
use crate::feed_cache::{FeedCache, FeedSource};
use crate::http::serve;
use crate::persistence::Persistence;
use crate::settings::config::Settings;
use crate::static_files::SpaDocument;
use crate::stop_flag::StopFlag;

/// The initialized process: shared state, the bound listener and the tasks
/// started along the way.
pub struct BootstrapState {
    pub app_state: SharedAppState,
    pub listener: TcpListener,
    pub handles: Vec<JoinHandle<anyhow::Result<()>>>,
}

/// Offline deployments get a gate without a verifier. Networked ones need a
/// decodable secret and a client id.
pub fn build_gate(settings: &Settings) -> Result<AuthorizationGate, CredentialsError> {
    let api_prefix = settings.api.normalized_api_prefix();

    if settings.offline {
        return Ok(AuthorizationGate::new(GateMode::Offline, api_prefix));
    }

    let credentials = ProviderCredentials::from_settings(&settings.auth)?;
    let verifier = JwtVerifier::new(&credentials, settings.auth.leeway_seconds);
    Ok(AuthorizationGate::new(
        GateMode::Networked(Arc::new(verifier)),
        api_prefix,
    ))
}

pub async fn initialize(settings: Settings, stop_flag: StopFlag) -> anyhow::Result<BootstrapState> {
    let gate = build_gate(&settings).context("Failed to configure the authorization gate")?;
    info!(
        offline = settings.offline,
        api_prefix = gate.api_prefix(),
        "Authorization gate configured"
    );

    let persistence = Persistence::initialize(&settings.storage)
        .await
        .context("Failed to initialize persistence")?;
    info!(path = %persistence.root().display(), "Persistence initialized");

    let cache_dir = settings.storage.local_cache.clone();
    tokio::fs::create_dir_all(&cache_dir)
        .await
        .with_context(|| format!("Failed to create local cache directory {}", cache_dir.display()))?;
    info!(path = %cache_dir.display(), "Local cache directory ready");

    let mut handles = vec![];
    let (feed_cache, cluster) = if settings.offline {
        let feed_cache = FeedCache::initialize(FeedSource::Local, &cache_dir)
            .await
            .context("Failed to initialize the local feed cache")?;
        let feed_cache = Arc::new(feed_cache);

        let (cluster, handle) =
            LocalCluster::start(&settings.cluster, feed_cache.clone(), stop_flag.clone())
                .await
                .context("Failed to start the local compute cluster")?;
        handles.push(handle);
        info!(address = %cluster.address(), "Local compute cluster started");

        (feed_cache, Some(cluster))
    } else {
        let bucket = settings.storage.bundle_bucket.clone().unwrap_or_default();
        let feed_cache = FeedCache::initialize(FeedSource::Bucket(bucket), &cache_dir)
            .await
            .context("Failed to initialize the bucket feed cache")?;
        (Arc::new(feed_cache), None)
    };

    let listener = TcpListener::bind(&settings.api.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.api.bind_address))?;
    info!(address = %settings.api.bind_address, "Listener bound");

    let spa = SpaDocument::load(&settings.api.asset_location)
        .context("Failed to prepare the single page app document")?;

    let app_state = Arc::new(AppState {
        settings,
        gate,
        persistence,
        feed_cache,
        cluster,
        spa,
        stop_flag,
    });

    Ok(BootstrapState {
        app_state,
        listener,
        handles,
    })
}

/// Initialize everything and start serving. Returns the handles of all
/// running tasks.
pub async fn run(
    settings: Settings,
    stop_flag: StopFlag,
    telemetry_enabled: bool,
) -> anyhow::Result<Vec<JoinHandle<anyhow::Result<()>>>> {
    let state = match initialize(settings, stop_flag.clone()).await {
        Ok(state) => state,
        Err(e) => {
            // Tasks that did start must not outlive a failed startup.
            stop_flag.stop();
            return Err(e);
        }
    };

    let BootstrapState {
        app_state,
        listener,
        mut handles,
    } = state;

    let handle = serve(app_state, listener, telemetry_enabled)
        .context("Failed to start the HTTP server")?;
    handles.push(handle);

    Ok(handles)
}
