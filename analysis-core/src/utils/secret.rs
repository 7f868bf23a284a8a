//! Secret configuration values backed by the secrecy crate
//!
//! `MaskedSecret` keeps the identity provider secret out of `Debug` and
//! `Display` output (so `analysis-server config` can print the settings
//! tree) and zeroizes the value on drop.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use super::sensitive_data::mask_sensitive_value;

/// A secret string that shows only a masked suffix when formatted.
///
/// # Example
/// ```
/// use analysis_core::utils::secret::MaskedSecret;
///
/// let secret = MaskedSecret::new("c2VjcmV0LXNpZ25pbmcta2V5".to_string());
/// assert_eq!(format!("{:?}", secret), "\"********************a2V5\"");
/// assert_eq!(secret.expose_secret(), "c2VjcmV0LXNpZ25pbmcta2V5");
/// ```
#[derive(Clone)]
pub struct MaskedSecret(SecretString);

impl MaskedSecret {
    pub fn new(value: String) -> Self {
        Self(SecretString::new(value.into_boxed_str()))
    }

    /// Expose the secret value. Only the credential decoder should need this.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", mask_sensitive_value(self.0.expose_secret()))
    }
}

impl std::fmt::Display for MaskedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", mask_sensitive_value(self.0.expose_secret()))
    }
}

impl<'de> Deserialize<'de> for MaskedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(MaskedSecret::new(value))
    }
}

impl From<&str> for MaskedSecret {
    fn from(value: &str) -> Self {
        MaskedSecret::new(value.to_string())
    }
}
