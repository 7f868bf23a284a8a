use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::GateError;
use super::tenant::TenantGroup;

/// Claim key granting access to the analysis service.
pub const TENANT_SCOPE_CLAIM: &str = "analyst";
/// Field inside the tenant scope claim naming the tenant group.
pub const TENANT_GROUP_FIELD: &str = "group";

/// Claims asserted by a verified token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Subject of the token, when the provider sets one.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn tenant_scope(&self) -> Option<&Value> {
        self.get(TENANT_SCOPE_CLAIM)
    }

    /// `analyst.group` as a tenant group.
    ///
    /// A missing `analyst` claim is [`GateError::NotEntitled`]. A scope that
    /// is not an object, lacks a string `group`, or names an empty group is
    /// [`GateError::NoGroup`].
    pub fn tenant_group(&self) -> Result<TenantGroup, GateError> {
        let scope = self.tenant_scope().ok_or(GateError::NotEntitled)?;

        scope
            .as_object()
            .and_then(|scope| scope.get(TENANT_GROUP_FIELD))
            .and_then(Value::as_str)
            .and_then(TenantGroup::new)
            .ok_or(GateError::NoGroup)
    }
}
