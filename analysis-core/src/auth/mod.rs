//! Tenant authorization.
//!
//! API requests carry `Authorization: Bearer <token>`. The token is verified
//! with the identity provider's shared secret, and the `analyst.group` claim
//! names the tenant the request acts for. Offline deployments skip all of
//! this and attribute every request to the `OFFLINE` group.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod tenant;
pub mod verifier;

pub use claims::Claims;
pub use credentials::{CredentialsError, ProviderCredentials};
pub use error::GateError;
pub use gate::{AuthDecision, AuthorizationGate, GateMode};
pub use tenant::{TenantGroup, VerifiedIdentity, OFFLINE_TENANT_GROUP};
pub use verifier::{JwtVerifier, TokenVerifier, VerificationError};
