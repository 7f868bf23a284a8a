use axum::http::StatusCode;
use thiserror::Error;

/// Why the authorization gate refused a request.
///
/// The `Display` text is what the client sees. Verification failures never
/// carry the underlying cause; the gate logs it instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    /// No `Authorization` header, or an empty one
    #[error("You must be logged in.")]
    MissingCredentials,

    /// Header present but not `Bearer <credential>`; carries the raw header value
    #[error("Authorization header is malformed: {0}")]
    MalformedCredentials(String),

    /// The identity provider rejected the credential
    #[error("Login failed to verify with our authorization provider.")]
    VerificationFailed,

    /// Valid token without the tenant scope claim
    #[error("Access denied. User does not have access to Analysis.")]
    NotEntitled,

    /// Tenant scope claim present but no usable group in it
    #[error("Access denied. User is not associated with any group.")]
    NoGroup,
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::MissingCredentials => StatusCode::UNAUTHORIZED,
            GateError::MalformedCredentials(_) => StatusCode::BAD_REQUEST,
            GateError::VerificationFailed | GateError::NotEntitled | GateError::NoGroup => {
                StatusCode::FORBIDDEN
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::MissingCredentials => "missing_credentials",
            GateError::MalformedCredentials(_) => "malformed_credentials",
            GateError::VerificationFailed => "verification_failed",
            GateError::NotEntitled => "not_entitled",
            GateError::NoGroup => "no_group",
        }
    }
}

impl From<GateError> for StatusCode {
    fn from(error: GateError) -> Self {
        error.status_code()
    }
}
