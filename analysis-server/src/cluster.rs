//! In-process compute cluster for offline deployments.
//!
//! A single worker is started next to the API server and answers on its own
//! loopback port. Its machine id is process-wide, which is why
//! `cluster.worker_count` has to be exactly 1.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use analysis_core::settings::cluster::{ClusterSettings, ClusterSettingsError};

use crate::feed_cache::FeedCache;
use crate::stop_flag::StopFlag;

static MACHINE_ID: Lazy<Uuid> = Lazy::new(Uuid::new_v4);

pub fn machine_id() -> Uuid {
    *MACHINE_ID
}

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error(transparent)]
    Settings(#[from] ClusterSettingsError),

    #[error("Could not bind worker port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatus {
    #[schema(value_type = String, format = "uuid")]
    pub machine_id: Uuid,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    pub mode: String,
    pub port: u16,
    pub workers: Vec<WorkerStatus>,
    pub feed_location: String,
}

#[derive(Debug, Clone)]
pub struct LocalCluster {
    address: SocketAddr,
    feed_cache: Arc<FeedCache>,
}

impl LocalCluster {
    /// Validate the settings, bind the worker port and spawn the worker.
    ///
    /// The returned handle finishes once the stop flag is raised.
    pub async fn start(
        settings: &ClusterSettings,
        feed_cache: Arc<FeedCache>,
        stop_flag: StopFlag,
    ) -> Result<(LocalCluster, JoinHandle<anyhow::Result<()>>), ClusterError> {
        settings.validate()?;

        let port = settings.port;
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .await
            .map_err(|source| ClusterError::Bind { port, source })?;
        let address = listener
            .local_addr()
            .map_err(|source| ClusterError::Bind { port, source })?;

        let cluster = LocalCluster {
            address,
            feed_cache,
        };

        let app = Router::new()
            .route("/status", get(worker_status))
            .with_state(cluster.clone());

        let handle = tokio::spawn(async move {
            info!(address = %address, machine_id = %machine_id(), "Local worker started");
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    stop_flag.wait().await;
                    info!("Stop flag was set, shutting down local worker");
                })
                .await?;
            info!("Local worker is down");
            Ok::<(), anyhow::Error>(())
        });

        Ok((cluster, handle))
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn status(&self) -> ClusterStatus {
        ClusterStatus {
            mode: "local".to_string(),
            port: self.address.port(),
            workers: vec![self.worker()],
            feed_location: self.feed_cache.location(),
        }
    }

    fn worker(&self) -> WorkerStatus {
        WorkerStatus {
            machine_id: machine_id(),
            address: self.address.to_string(),
        }
    }
}

async fn worker_status(State(cluster): State<LocalCluster>) -> Json<WorkerStatus> {
    Json(cluster.worker())
}
