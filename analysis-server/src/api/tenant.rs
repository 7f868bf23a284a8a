use axum::{extract::FromRequestParts, http::request::Parts};

use analysis_core::auth::{GateError, TenantGroup, VerifiedIdentity};

use crate::api::error::AppError;

/// The identity the authorization gate attached to the request.
///
/// ```rust,ignore
/// async fn handler(Tenant(identity): Tenant) -> impl IntoResponse {
///     identity.tenant_group.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Tenant(pub VerifiedIdentity);

impl Tenant {
    pub fn group(&self) -> &TenantGroup {
        &self.0.tenant_group
    }
}

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only requests that passed the gate carry an identity.
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(Tenant)
            .ok_or(AppError::Gate(GateError::MissingCredentials))
    }
}
