use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::tenant::Tenant;
use crate::app_state::SharedAppState;
use crate::cluster::ClusterStatus;

#[utoipa::path(
    get,
    path = "/api/cluster",
    responses(
    (status = 200, description = "Local worker status in offline mode, `{\"mode\":\"external\"}` otherwise", body = ClusterStatus)
    ),
    security(("bearerAuth" = []))
)]
pub async fn cluster_status_handler(
    State(state): State<SharedAppState>,
    _tenant: Tenant,
) -> Response {
    match &state.cluster {
        Some(cluster) => Json(cluster.status()).into_response(),
        None => Json(serde_json::json!({ "mode": "external" })).into_response(),
    }
}
