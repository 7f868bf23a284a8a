//! The authorization decision procedure.
//!
//! [`AuthorizationGate::decide`] turns a request path plus its
//! `Authorization` header into exactly one [`AuthDecision`]. Writing the
//! HTTP response is left to the server middleware.

use std::sync::Arc;

use axum::http::HeaderValue;
use tracing::{debug, info};

use super::error::GateError;
use super::tenant::VerifiedIdentity;
use super::verifier::TokenVerifier;
use crate::settings::api_server::DEFAULT_API_PREFIX;
use crate::utils::sensitive_data::mask_authorization_header;

/// Scheme expected in front of the credential, compared case-insensitively.
pub const BEARER_SCHEME: &str = "bearer";

#[derive(Clone)]
pub enum GateMode {
    /// Single tenant deployment: every API request belongs to the offline group.
    Offline,
    /// Multi tenant deployment: bearer tokens are verified by the given verifier.
    Networked(Arc<dyn TokenVerifier>),
}

impl std::fmt::Debug for GateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateMode::Offline => f.write_str("Offline"),
            GateMode::Networked(_) => f.write_str("Networked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthDecision {
    /// Continue to the handler. `None` means the path is exempt from the gate.
    Admit(Option<VerifiedIdentity>),
    Deny(GateError),
}

impl AuthDecision {
    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        match self {
            AuthDecision::Admit(identity) => identity.as_ref(),
            AuthDecision::Deny(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    mode: GateMode,
    api_prefix: String,
}

impl AuthorizationGate {
    pub fn new(mode: GateMode, api_prefix: &str) -> Self {
        let api_prefix = api_prefix.trim_end_matches('/');
        let api_prefix = if api_prefix.is_empty() {
            DEFAULT_API_PREFIX
        } else {
            api_prefix
        };

        Self {
            mode,
            api_prefix: api_prefix.to_string(),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.mode, GateMode::Offline)
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// `true` for the prefix itself and everything below it. `/apiary` is not
    /// under `/api`.
    pub fn is_api_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.api_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub async fn decide(&self, path: &str, authorization: Option<&HeaderValue>) -> AuthDecision {
        if !self.is_api_path(path) {
            return AuthDecision::Admit(None);
        }

        let verifier = match &self.mode {
            GateMode::Offline => return AuthDecision::Admit(Some(VerifiedIdentity::offline())),
            GateMode::Networked(verifier) => verifier,
        };

        match authenticate(verifier.as_ref(), authorization).await {
            Ok(identity) => {
                debug!(group = %identity.tenant_group, path, "request admitted");
                AuthDecision::Admit(Some(identity))
            }
            Err(error) => {
                debug!(code = error.error_code(), path, "request denied");
                AuthDecision::Deny(error)
            }
        }
    }
}

async fn authenticate(
    verifier: &dyn TokenVerifier,
    authorization: Option<&HeaderValue>,
) -> Result<VerifiedIdentity, GateError> {
    // Present but blank is malformed, not missing.
    let header = authorization
        .filter(|value| !value.is_empty())
        .ok_or(GateError::MissingCredentials)?;

    let header = header.to_str().map_err(|_| {
        GateError::MalformedCredentials(String::from_utf8_lossy(header.as_bytes()).into_owned())
    })?;
    let credential = parse_bearer(header)?;

    let claims = verifier.verify(credential).await.map_err(|error| {
        info!(
            error = %error,
            authorization = %mask_authorization_header(header),
            "Login failed"
        );
        GateError::VerificationFailed
    })?;

    VerifiedIdentity::from_claims(claims)
}

/// Split `Bearer <credential>` into its credential.
///
/// The value has to consist of exactly two whitespace separated parts and
/// the first one has to be `bearer` in any casing.
pub fn parse_bearer(header: &str) -> Result<&str, GateError> {
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(credential), None) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => {
            Ok(credential)
        }
        _ => Err(GateError::MalformedCredentials(header.to_string())),
    }
}
