//! Token verification against the identity provider.
//!
//! The gate only depends on [`TokenVerifier`]. [`JwtVerifier`] checks HS256
//! tokens signed with the shared provider secret locally, so no network call
//! happens per request.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use super::claims::Claims;
use super::credentials::ProviderCredentials;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token audience does not match the configured client id")]
    InvalidAudience,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
            ErrorKind::InvalidAudience => VerificationError::InvalidAudience,
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => {
                VerificationError::InvalidAudience
            }
            _ => VerificationError::Malformed(error.to_string()),
        }
    }
}

/// Verifies a bearer credential and returns its claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<Claims, VerificationError>;
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(credentials: &ProviderCredentials, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        validation.set_audience(&[credentials.client_id()]);
        // exp and nbf are checked when present; only the audience is mandatory
        validation.set_required_spec_claims(&["aud"]);

        Self {
            key: DecodingKey::from_secret(credentials.secret_bytes()),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, credential: &str) -> Result<Claims, VerificationError> {
        let token = decode::<Claims>(credential, &self.key, &self.validation)?;
        Ok(token.claims)
    }
}
