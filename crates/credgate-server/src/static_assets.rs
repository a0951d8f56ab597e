use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct StaticAssetError(pub String);

impl std::fmt::Display for StaticAssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StaticAssetError {}

/// Maps a request path to a file under the static root. Any component that
/// could escape the root (`..`, absolute segments, prefixes) is rejected.
fn resolve_safe(root: &Path, request_path: &str) -> Result<PathBuf, StaticAssetError> {
    let trimmed = request_path.trim_start_matches('/');
    let mut resolved = root.to_path_buf();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => {
                return Err(StaticAssetError(format!(
                    "path traversal blocked: {request_path}"
                )))
            }
        }
    }
    Ok(resolved)
}

async fn read_asset(path: &Path) -> Result<Vec<u8>, StaticAssetError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| StaticAssetError(format!("asset read failed: {e}")))
}

/// Serves static assets for every non-`/api` path. A miss (or a blocked
/// path) substitutes the SPA entry document with a forced 200 so client-side
/// routes resolve; only a missing entry document is a hard failure.
pub(crate) async fn spa_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let root = &state.server.static_root;
    let request_path = uri.path();

    if request_path != "/" {
        if let Ok(candidate) = resolve_safe(root, request_path) {
            if let Ok(bytes) = read_asset(&candidate).await {
                let mime = mime_guess::from_path(&candidate).first_or_octet_stream();
                return ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response();
            }
        }
    }

    let index = root.join(&state.server.spa_index);
    match read_asset(&index).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("spa fallback unavailable: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
