use serde::Deserialize;

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const ASSET_LOCATION_PLACEHOLDER: &str = "${ASSET_LOCATION}";

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
    /// Every path under this prefix passes the authorization gate.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Substituted for `${ASSET_LOCATION}` in the single page app document.
    #[serde(default)]
    pub asset_location: String,
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:7070".to_string(),
            api_prefix: default_api_prefix(),
            asset_location: String::new(),
        }
    }
}

impl ApiServer {
    /// The prefix without a trailing slash, so `/api/` and `/api` behave the same.
    pub fn normalized_api_prefix(&self) -> &str {
        let trimmed = self.api_prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_API_PREFIX
        } else {
            trimmed
        }
    }
}
