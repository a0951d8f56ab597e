#![forbid(unsafe_code)]

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

mod config;
mod http;
mod static_assets;
mod store;

pub use config::{validate_startup_config_contract, ServerConfig, UpstreamConfig};
pub use static_assets::StaticAssetError;
pub use store::{FakeRecordSource, RecordSource, TableApiBackend, UpstreamError};

pub const CRATE_NAME: &str = "credgate-server";

/// Shared per-request context. The snapshot is re-fetched on every API call;
/// nothing here is mutable across requests.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, server: ServerConfig) -> Self {
        Self {
            source,
            server: Arc::new(server),
        }
    }
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("Content-Type, x-token"),
    );
}

/// Preflight and response stamping for the API surface only; static paths
/// pass through untouched. `OPTIONS /api/*` is answered here without
/// reaching a handler, so no upstream call is made.
async fn cors_middleware(req: Request, next: Next) -> Response {
    let is_api = req.uri().path().starts_with("/api");
    if is_api && req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(resp.headers_mut());
        return resp;
    }
    let mut resp = next.run(req).await;
    if is_api {
        apply_cors_headers(resp.headers_mut());
    }
    resp
}

/// Anything the exact-path routes above did not claim: unknown API paths get
/// the JSON 404, everything else resolves as a static asset with SPA
/// fallback.
async fn root_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    if uri.path().starts_with("/api") {
        http::handlers::api_not_found_handler().await
    } else {
        static_assets::spa_handler(State(state), uri).await
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/certifications",
            get(http::handlers::certifications_handler)
                .fallback(http::handlers::api_not_found_handler),
        )
        .route(
            "/api/summary",
            get(http::handlers::summary_handler).fallback(http::handlers::api_not_found_handler),
        )
        .route(
            "/api/monthly-trends",
            get(http::handlers::monthly_trends_handler)
                .fallback(http::handlers::api_not_found_handler),
        )
        .route(
            "/api/table-data",
            get(http::handlers::table_data_handler).fallback(http::handlers::api_not_found_handler),
        )
        .fallback(root_fallback)
        .layer(from_fn(cors_middleware))
        .with_state(state)
}
