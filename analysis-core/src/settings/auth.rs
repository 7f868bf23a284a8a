use serde::Deserialize;

use crate::utils::secret::MaskedSecret;

/// Clock skew tolerance applied to `exp` and `nbf`.
pub const DEFAULT_LEEWAY_SECONDS: u64 = 60;

/// Identity provider settings. Only consulted in networked mode.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthSettings {
    /// Base64 encoded HMAC signing secret shared with the identity provider.
    #[serde(default)]
    pub secret: Option<MaskedSecret>,
    /// Client identifier, checked against the token audience.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
}

fn default_leeway_seconds() -> u64 {
    DEFAULT_LEEWAY_SECONDS
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            client_id: None,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        }
    }
}
