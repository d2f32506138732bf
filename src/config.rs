//! Client configuration: where the backend lives, the session credential,
//! and how aggressively polled views refresh.

use crate::refresh::RefreshPolicy;
use std::env;
use std::time::Duration;

/// Configuration for one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend REST surface, without a trailing slash.
    pub base_url: String,
    /// Bearer token for an already-established session, if any.
    pub auth_token: Option<String>,
    /// Refresh policy for polled staff/admin views.
    pub refresh: RefreshPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            auth_token: None,
            refresh: RefreshPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the environment:
    /// `CANTEEN_API_URL`, `CANTEEN_API_TOKEN`, `CANTEEN_REFRESH_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("CANTEEN_API_URL") {
            config.base_url = url;
        }
        if let Ok(token) = env::var("CANTEEN_API_TOKEN") {
            config.auth_token = Some(token);
        }
        if let Some(secs) = env::var("CANTEEN_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.refresh = RefreshPolicy::every(Duration::from_secs(secs));
        }
        config
    }
}
