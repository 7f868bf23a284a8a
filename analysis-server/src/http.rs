use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{api::router::ApiRoutes, app_state::SharedAppState};

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}

/// Wire the router and serve it on the already bound listener until the stop
/// flag is raised.
pub fn serve(
    app_state: SharedAppState,
    listener: TcpListener,
    telemetry_enabled: bool,
) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
    let app = ApiRoutes::create(app_state.clone()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer()),
    );

    #[cfg(feature = "telemetry")]
    let app = if telemetry_enabled {
        use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
        app.layer(OtelInResponseLayer)
            .layer(OtelAxumLayer::default())
    } else {
        app
    };
    #[cfg(not(feature = "telemetry"))]
    let _ = telemetry_enabled;

    let address = listener.local_addr()?;
    info!(
        address = %address,
        offline = app_state.gate.is_offline(),
        "Analysis server ready at http://{}",
        address
    );

    let stop_flag = app_state.stop_flag.clone();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop_flag.wait().await;
                info!("Stop flag was set, shutting down HTTP server gracefully");
            })
            .await?;
        info!("HTTP server is down");
        Ok::<(), anyhow::Error>(())
    });

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_utils::{create_test_app_state, settings_for};
    use crate::bootstrap::build_gate;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_server_stops_with_stop_flag() {
        let dir = TempDir::new().unwrap();
        let settings = settings_for(true, dir.path(), &[]);
        let gate = build_gate(&settings).unwrap();
        let app_state = create_test_app_state(settings, gate).await;
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = serve(app_state.clone(), listener, false).unwrap();
        let stream = tokio::net::TcpStream::connect(address).await;
        assert!(stream.is_ok());
        drop(stream);

        app_state.stop_flag.stop();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("server should stop")
            .unwrap()
            .unwrap();
    }
}
