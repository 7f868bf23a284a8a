use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

use analysis_core::auth::TenantGroup;

use crate::api::error::ErrorBody;
use crate::api::gate::authorization_gate;
use crate::api::handlers::bookmarks::{
    create_bookmark_handler, delete_bookmark_handler, get_bookmark_handler,
    list_bookmarks_handler, Bookmark, CreateBookmarkRequest,
};
use crate::api::handlers::bookmarks::{
    __path_create_bookmark_handler, __path_delete_bookmark_handler, __path_get_bookmark_handler,
    __path_list_bookmarks_handler,
};
use crate::api::handlers::cluster::{__path_cluster_status_handler, cluster_status_handler};
use crate::api::handlers::health::{__path_health_checker_handler, health_checker_handler};
use crate::api::handlers::info::{__path_info_handler, info_handler, ServerInfo};
use crate::app_state::SharedAppState;
use crate::cluster::{ClusterStatus, WorkerStatus};
use crate::static_files::serve_frontend;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        info_handler,
        list_bookmarks_handler,
        create_bookmark_handler,
        get_bookmark_handler,
        delete_bookmark_handler,
        cluster_status_handler,
    ),
    components(
        schemas(
            ServerInfo, Bookmark, CreateBookmarkRequest, ClusterStatus, WorkerStatus,
            TenantGroup, ErrorBody
        )
    ),
    tags(
        (name = "analysis-server", description = "transit analysis api")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn info_routes() -> Router<SharedAppState> {
    Router::new().route("/info", get(info_handler))
}

fn bookmark_routes() -> Router<SharedAppState> {
    Router::new()
        .route(
            "/bookmark",
            get(list_bookmarks_handler).post(create_bookmark_handler),
        )
        .route(
            "/bookmark/{id}",
            get(get_bookmark_handler).delete(delete_bookmark_handler),
        )
}

fn cluster_routes() -> Router<SharedAppState> {
    Router::new().route("/cluster", get(cluster_status_handler))
}

pub struct ApiRoutes;

impl ApiRoutes {
    /// The complete application router.
    ///
    /// The gate wraps everything, the frontend fallback included, and only
    /// lets requests below the API prefix through after a decision.
    pub fn create(state: SharedAppState) -> Router {
        let api_prefix = state.gate.api_prefix().to_string();

        let controllers = Router::new()
            .merge(info_routes())
            .merge(bookmark_routes())
            .merge(cluster_routes());

        Router::new()
            .nest(&api_prefix, controllers)
            .route("/health", get(health_checker_handler))
            .route(OPENAPI_PATH, get(openapi_handler))
            .fallback(serve_frontend)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                authorization_gate,
            ))
            .with_state(state)
    }
}
