//! Embedded single page application.
//!
//! Everything below `public/` is compiled into the binary. `index.html` is a
//! template: every `${ASSET_LOCATION}` is replaced with the configured asset
//! base once at startup, and the result is served for every client side
//! route.

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use include_dir::{include_dir, Dir};
use thiserror::Error;

use analysis_core::settings::api_server::ASSET_LOCATION_PLACEHOLDER;

use crate::api::error::AppError;
use crate::app_state::SharedAppState;

static PUBLIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/public");

pub const INDEX_DOCUMENT: &str = "index.html";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpaError {
    #[error("The embedded frontend has no {0}")]
    MissingDocument(&'static str),

    #[error("{0} is not valid UTF-8")]
    NotUtf8(&'static str),
}

/// The prepared entry document.
#[derive(Debug, Clone)]
pub struct SpaDocument {
    html: String,
}

impl SpaDocument {
    pub fn load(asset_location: &str) -> Result<Self, SpaError> {
        let file = PUBLIC_DIR
            .get_file(INDEX_DOCUMENT)
            .ok_or(SpaError::MissingDocument(INDEX_DOCUMENT))?;
        let template = file
            .contents_utf8()
            .ok_or(SpaError::NotUtf8(INDEX_DOCUMENT))?;
        Ok(Self::from_template(template, asset_location))
    }

    pub fn from_template(template: &str, asset_location: &str) -> Self {
        let asset_location = asset_location.trim_end_matches('/');
        Self {
            html: template.replace(ASSET_LOCATION_PLACEHOLDER, asset_location),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl IntoResponse for SpaDocument {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "text/html; charset=utf-8")], self.html).into_response()
    }
}

/// Router fallback.
///
/// Unknown API paths get a JSON 404, embedded files are served as they are,
/// anything else is a client side route and gets the entry document.
pub async fn serve_frontend(State(state): State<SharedAppState>, uri: Uri) -> Response {
    let path = uri.path();
    if state.gate.is_api_path(path) {
        return AppError::NotFound(path.to_string()).into_response();
    }

    let file_path = path.trim_start_matches('/');
    if file_path != INDEX_DOCUMENT {
        if let Some(file) = PUBLIC_DIR.get_file(file_path) {
            let mime_type = mime_guess::from_path(file_path).first_or_octet_stream();
            return (
                StatusCode::OK,
                [(CONTENT_TYPE, mime_type.as_ref().to_string())],
                Body::from(file.contents()),
            )
                .into_response();
        }
    }

    state.spa.clone().into_response()
}
