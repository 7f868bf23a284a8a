use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::Claims;
use super::error::GateError;

/// Group every request is attributed to in offline deployments.
pub const OFFLINE_TENANT_GROUP: &str = "OFFLINE";

/// Identifier isolating one customer's data from another's. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct TenantGroup(String);

impl TenantGroup {
    /// Returns `None` for empty or whitespace-only groups.
    pub fn new(group: impl Into<String>) -> Option<Self> {
        let group = group.into();
        if group.trim().is_empty() {
            None
        } else {
            Some(Self(group))
        }
    }

    pub fn offline() -> Self {
        Self(OFFLINE_TENANT_GROUP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TenantGroup::new(value).ok_or_else(|| "tenant group must not be empty".to_string())
    }
}

impl From<TenantGroup> for String {
    fn from(group: TenantGroup) -> Self {
        group.0
    }
}

impl AsRef<str> for TenantGroup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-scoped identity attached by the gate on admission.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub tenant_group: TenantGroup,
    pub claims: Claims,
}

impl VerifiedIdentity {
    pub fn offline() -> Self {
        Self {
            tenant_group: TenantGroup::offline(),
            claims: Claims::default(),
        }
    }

    /// Resolve the tenant group from verified claims.
    pub fn from_claims(claims: Claims) -> Result<Self, GateError> {
        let tenant_group = claims.tenant_group()?;
        Ok(Self {
            tenant_group,
            claims,
        })
    }
}
