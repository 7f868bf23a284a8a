use std::sync::Arc;

use analysis_core::auth::AuthorizationGate;

use crate::cluster::LocalCluster;
use crate::feed_cache::FeedCache;
use crate::persistence::Persistence;
use crate::settings::config::Settings;
use crate::static_files::SpaDocument;
use crate::stop_flag::StopFlag;

/// Everything the request handlers share. Built once by the startup
/// sequence and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub gate: AuthorizationGate,
    pub persistence: Persistence,
    pub feed_cache: Arc<FeedCache>,
    /// Only present in offline mode.
    pub cluster: Option<LocalCluster>,
    pub spa: SpaDocument,
    pub stop_flag: StopFlag,
}

pub type SharedAppState = Arc<AppState>;
