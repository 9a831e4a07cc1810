//! Middleware configuration.

use std::time::Duration;

/// Connection settings for the node key resolver.
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// JSON-RPC endpoint of the confidential node.
    pub rpc_url: String,
    /// Provider polling interval.
    pub polling_interval: Duration,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            polling_interval: Duration::from_millis(100),
        }
    }
}

impl MiddlewareConfig {
    /// Load settings from the environment, falling back to defaults.
    ///
    /// Reads `NODE_RPC_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("NODE_RPC_URL") {
            config.rpc_url = url;
        }
        config
    }
}
