#![forbid(unsafe_code)]

use credgate_server::{
    build_router, validate_startup_config_contract, AppState, ServerConfig, TableApiBackend,
    UpstreamConfig,
};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(
        env::var(name)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(default_ms),
    )
}

fn upstream_config_from_env() -> UpstreamConfig {
    UpstreamConfig {
        base_url: env_str("CREDGATE_UPSTREAM_URL", ""),
        api_token: env_str("CREDGATE_UPSTREAM_TOKEN", ""),
        table_id: env_str("CREDGATE_TABLE_ID", ""),
        fetch_limit: env_u32("CREDGATE_FETCH_LIMIT", 10_000),
        timeout: env_duration_ms("CREDGATE_UPSTREAM_TIMEOUT_MS", 15_000),
    }
}

fn server_config_from_env() -> ServerConfig {
    ServerConfig {
        bind_addr: env_str("CREDGATE_BIND_ADDR", "0.0.0.0:8787"),
        static_root: PathBuf::from(env_str("CREDGATE_STATIC_ROOT", "public")),
        spa_index: env_str("CREDGATE_SPA_INDEX", "index.html"),
    }
}

async fn run() -> Result<(), String> {
    let upstream = upstream_config_from_env();
    let server = server_config_from_env();
    validate_startup_config_contract(&upstream, &server)?;

    let bind_addr = server.bind_addr.clone();
    let source = Arc::new(TableApiBackend::new(upstream));
    let app = build_router(AppState::new(source, server));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("credgate-server listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received; draining");
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(message) = run().await {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}
