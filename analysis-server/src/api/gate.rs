use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use analysis_core::auth::AuthDecision;

use crate::api::error::AppError;
use crate::app_state::SharedAppState;

/// Runs the authorization gate in front of every route, fallback included.
///
/// Denied requests never reach a handler. Admitted API requests carry their
/// `VerifiedIdentity` in the request extensions, and their response defaults
/// to `application/json` when the handler did not set a content type.
pub async fn authorization_gate(
    State(state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let authorization = req.headers().get(AUTHORIZATION).cloned();
    let decision = state.gate.decide(&path, authorization.as_ref()).await;

    match decision {
        AuthDecision::Deny(error) => AppError::from(error).into_response(),
        AuthDecision::Admit(None) => next.run(req).await,
        AuthDecision::Admit(Some(identity)) => {
            req.extensions_mut().insert(identity);
            let mut response = next.run(req).await;
            response
                .headers_mut()
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            response
        }
    }
}
