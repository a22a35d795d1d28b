//! Administration API connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how to reach the administration API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every relative path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Bearer token attached to every request, if any.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Base URL with any trailing slashes removed.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Join a relative API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.normalized_base_url(),
            path.trim_start_matches('/')
        )
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            auth_token: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("memberhub/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_slashes() {
        let config = ApiConfig {
            base_url: "https://admin.example.org/api//".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.endpoint("/members/search"),
            "https://admin.example.org/api/members/search"
        );
        assert_eq!(
            config.endpoint("agents"),
            "https://admin.example.org/api/agents"
        );
    }
}
