// SPDX-License-Identifier: Apache-2.0

use crate::store::UpstreamError;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use credgate_api::ApiError;
use credgate_query::{build_monthly_trends, query_table, summarize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{error, info};

/// Flat JSON error envelope: `{"error": <message>}`, with `details` only
/// when the error carries any.
pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = json!({"error": err.message});
    if err.details != Value::Object(serde_json::Map::new()) {
        body["details"] = err.details.clone();
    }
    (status, Json(body)).into_response()
}

fn upstream_error_response(err: &UpstreamError) -> Response {
    error!(status = ?err.status, "upstream fetch failed: {err}");
    api_error_response(&ApiError::upstream_failed(
        "Failed to fetch certification records",
        Value::String(err.to_string()),
    ))
}

pub(crate) async fn certifications_handler(State(state): State<AppState>) -> Response {
    info!(route = "/api/certifications", "request start");
    match state.source.fetch_records().await {
        Ok(records) => Json(records).into_response(),
        Err(err) => upstream_error_response(&err),
    }
}

pub(crate) async fn summary_handler(State(state): State<AppState>) -> Response {
    info!(route = "/api/summary", "request start");
    match state.source.fetch_records().await {
        Ok(records) => Json(summarize(&records)).into_response(),
        Err(err) => upstream_error_response(&err),
    }
}

pub(crate) async fn monthly_trends_handler(State(state): State<AppState>) -> Response {
    info!(route = "/api/monthly-trends", "request start");
    match state.source.fetch_records().await {
        Ok(records) => {
            let trends = build_monthly_trends(&records, Utc::now().date_naive());
            Json(trends).into_response()
        }
        Err(err) => upstream_error_response(&err),
    }
}

pub(crate) async fn table_data_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    info!(route = "/api/table-data", "request start");
    let query = match credgate_api::parse_table_params(&params) {
        Ok(query) => query,
        Err(err) => return api_error_response(&err),
    };
    match state.source.fetch_records().await {
        Ok(records) => Json(query_table(&records, &query)).into_response(),
        Err(err) => upstream_error_response(&err),
    }
}

/// Every unmatched `/api/*` path or method.
pub(crate) async fn api_not_found_handler() -> Response {
    api_error_response(&ApiError::endpoint_not_found())
}
