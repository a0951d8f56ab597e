use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// The upstream table resource. The table identifier is injected here at
/// startup, never hardcoded at a call site.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_token: String,
    pub table_id: String,
    /// One capped snapshot fetch; the gateway never paginates upstream.
    pub fetch_limit: u32,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: String::new(),
            table_id: String::new(),
            fetch_limit: 10_000,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_root: PathBuf,
    pub spa_index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8787".to_string(),
            static_root: PathBuf::from("public"),
            spa_index: "index.html".to_string(),
        }
    }
}

pub fn validate_startup_config_contract(
    upstream: &UpstreamConfig,
    server: &ServerConfig,
) -> Result<(), String> {
    if upstream.base_url.trim().is_empty() {
        return Err("upstream base url must not be empty".to_string());
    }
    if upstream.table_id.trim().is_empty() {
        return Err("upstream table id must not be empty".to_string());
    }
    if upstream.api_token.is_empty() {
        return Err("upstream api token must not be empty".to_string());
    }
    if upstream.fetch_limit == 0 {
        return Err("upstream fetch limit must be > 0".to_string());
    }
    if upstream.timeout.is_zero() {
        return Err("upstream timeout must be > 0".to_string());
    }
    if server.spa_index.trim().is_empty() {
        return Err("spa index document must not be empty".to_string());
    }
    Ok(())
}
