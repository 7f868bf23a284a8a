use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use secrecy::{ExposeSecret, SecretSlice};
use thiserror::Error;

use crate::settings::auth::AuthSettings;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("auth.secret is not configured")]
    MissingSecret,

    #[error("auth.secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("auth.secret decodes to an empty key")]
    EmptySecret,

    #[error("auth.client_id is not configured")]
    MissingClientId,
}

/// Decoded identity provider secret plus the client id tokens must be issued for.
#[derive(Debug)]
pub struct ProviderCredentials {
    secret: SecretSlice<u8>,
    client_id: String,
}

impl ProviderCredentials {
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, CredentialsError> {
        let secret = settings
            .secret
            .as_ref()
            .filter(|secret| !secret.is_empty())
            .ok_or(CredentialsError::MissingSecret)?;
        let client_id = settings.client_id.as_deref().unwrap_or_default();

        Self::decode(secret.expose_secret(), client_id)
    }

    /// Decode a base64 secret. Both the standard and the URL-safe alphabet
    /// are accepted, padding and surrounding whitespace are ignored.
    pub fn decode(secret: &str, client_id: &str) -> Result<Self, CredentialsError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(CredentialsError::MissingClientId);
        }

        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect();
        if normalized.is_empty() {
            return Err(CredentialsError::MissingSecret);
        }

        let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
        if bytes.is_empty() {
            return Err(CredentialsError::EmptySecret);
        }

        Ok(Self {
            secret: SecretSlice::from(bytes),
            client_id: client_id.to_string(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::secret::MaskedSecret;

    #[test]
    fn test_decodes_url_safe_and_standard_alphabets() {
        // 0xfb 0xff encodes as "-_8" (url-safe) and "+/8=" (standard)
        let url_safe = ProviderCredentials::decode("-_8", "client").unwrap();
        let standard = ProviderCredentials::decode("+/8=", "client").unwrap();
        assert_eq!(url_safe.secret_bytes(), &[0xfb, 0xff]);
        assert_eq!(standard.secret_bytes(), &[0xfb, 0xff]);
        assert_eq!(url_safe.client_id(), "client");
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let result = ProviderCredentials::decode("not*base64!", "client");
        assert!(matches!(result, Err(CredentialsError::InvalidSecret(_))));
    }

    #[test]
    fn test_rejects_blank_secret_and_client() {
        assert!(matches!(
            ProviderCredentials::decode("====", "client"),
            Err(CredentialsError::MissingSecret)
        ));
        assert!(matches!(
            ProviderCredentials::decode("c2VjcmV0", " "),
            Err(CredentialsError::MissingClientId)
        ));
    }

    #[test]
    fn test_from_settings_requires_secret() {
        let settings = AuthSettings {
            client_id: Some("client".into()),
            ..Default::default()
        };
        assert!(matches!(
            ProviderCredentials::from_settings(&settings),
            Err(CredentialsError::MissingSecret)
        ));

        let settings = AuthSettings {
            secret: Some(MaskedSecret::from("c2VjcmV0")),
            client_id: Some("client".into()),
            ..Default::default()
        };
        let credentials = ProviderCredentials::from_settings(&settings).unwrap();
        assert_eq!(credentials.secret_bytes(), b"secret");
    }
}
