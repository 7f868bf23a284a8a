use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use analysis_core::auth::TenantGroup;

use crate::api::tenant::Tenant;
use crate::app_state::SharedAppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub version: String,
    /// `offline` or `networked`
    pub mode: String,
    pub group: TenantGroup,
}

#[utoipa::path(
    get,
    path = "/api/info",
    responses(
    (status = 200, description = "Server version, operating mode and the caller's group", body = ServerInfo),
    (status = 401, description = "Not logged in", body = crate::api::error::ErrorBody),
    (status = 403, description = "Not entitled", body = crate::api::error::ErrorBody)
    ),
    security(("bearerAuth" = []))
)]
pub async fn info_handler(State(state): State<SharedAppState>, tenant: Tenant) -> Json<ServerInfo> {
    let mode = if state.gate.is_offline() {
        "offline"
    } else {
        "networked"
    };

    Json(ServerInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: mode.to_string(),
        group: tenant.group().clone(),
    })
}
