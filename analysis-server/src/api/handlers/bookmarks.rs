//! Bookmarks: frozen single point analysis settings.
//!
//! Bookmarks are stored per tenant group. A bookmark of another group
//! behaves exactly like one that does not exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use analysis_core::auth::TenantGroup;

use crate::api::error::AppError;
use crate::api::tenant::Tenant;
use crate::app_state::SharedAppState;

pub const BOOKMARK_COLLECTION: &str = "bookmarks";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub access_group: TenantGroup,
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub opportunity_dataset: Option<String>,
    #[serde(default)]
    pub isochrone_cutoff: Option<u32>,
    #[schema(value_type = Object)]
    #[serde(default)]
    pub profile_request: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub opportunity_dataset: Option<String>,
    #[serde(default)]
    pub isochrone_cutoff: Option<u32>,
    #[schema(value_type = Object)]
    #[serde(default)]
    pub profile_request: serde_json::Value,
}

impl CreateBookmarkRequest {
    fn into_bookmark(self, group: TenantGroup) -> Result<Bookmark, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("bookmark name must not be empty".into()));
        }
        if self.project_id.trim().is_empty() {
            return Err(AppError::InvalidInput("projectId must not be empty".into()));
        }

        Ok(Bookmark {
            id: Uuid::new_v4(),
            access_group: group,
            name: self.name.trim().to_string(),
            project_id: self.project_id,
            opportunity_dataset: self.opportunity_dataset,
            isochrone_cutoff: self.isochrone_cutoff,
            profile_request: self.profile_request,
            created_at: Utc::now(),
        })
    }
}

async fn find_bookmark(
    state: &SharedAppState,
    group: &TenantGroup,
    id: Uuid,
) -> Result<Bookmark, AppError> {
    state
        .persistence
        .get::<Bookmark>(BOOKMARK_COLLECTION, &id.to_string())
        .await?
        .filter(|bookmark| &bookmark.access_group == group)
        .ok_or(AppError::BookmarkNotFound(id))
}

#[utoipa::path(
    get,
    path = "/api/bookmark",
    responses(
    (status = 200, description = "Bookmarks of the caller's group", body = [Bookmark])
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_bookmarks_handler(
    State(state): State<SharedAppState>,
    tenant: Tenant,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let mut bookmarks: Vec<Bookmark> = state
        .persistence
        .list::<Bookmark>(BOOKMARK_COLLECTION)
        .await?
        .into_iter()
        .filter(|bookmark| &bookmark.access_group == tenant.group())
        .collect();
    bookmarks.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(Json(bookmarks))
}

#[utoipa::path(
    post,
    path = "/api/bookmark",
    request_body = CreateBookmarkRequest,
    responses(
    (status = 201, description = "Bookmark created", body = Bookmark),
    (status = 400, description = "Invalid bookmark", body = crate::api::error::ErrorBody)
    ),
    security(("bearerAuth" = []))
)]
pub async fn create_bookmark_handler(
    State(state): State<SharedAppState>,
    tenant: Tenant,
    Json(payload): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let bookmark = payload.into_bookmark(tenant.group().clone())?;
    state
        .persistence
        .put(BOOKMARK_COLLECTION, &bookmark.id.to_string(), &bookmark)
        .await?;

    info!(id = %bookmark.id, group = %bookmark.access_group, "Bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[utoipa::path(
    get,
    path = "/api/bookmark/{id}",
    params(("id" = String, Path, description = "Bookmark id")),
    responses(
    (status = 200, description = "The bookmark", body = Bookmark),
    (status = 404, description = "No such bookmark in the caller's group", body = crate::api::error::ErrorBody)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_bookmark_handler(
    State(state): State<SharedAppState>,
    tenant: Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = find_bookmark(&state, tenant.group(), id).await?;
    Ok(Json(bookmark))
}

#[utoipa::path(
    delete,
    path = "/api/bookmark/{id}",
    params(("id" = String, Path, description = "Bookmark id")),
    responses(
    (status = 200, description = "The deleted bookmark", body = Bookmark),
    (status = 404, description = "No such bookmark in the caller's group", body = crate::api::error::ErrorBody)
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete_bookmark_handler(
    State(state): State<SharedAppState>,
    tenant: Tenant,
    Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = find_bookmark(&state, tenant.group(), id).await?;
    state
        .persistence
        .delete(BOOKMARK_COLLECTION, &id.to_string())
        .await?;

    info!(id = %id, group = %bookmark.access_group, "Bookmark deleted");
    Ok(Json(bookmark))
}
