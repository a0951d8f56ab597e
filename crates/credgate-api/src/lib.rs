#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub mod params;

pub use params::parse_table_params;

pub const CRATE_NAME: &str = "credgate-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    NotFound,
    UpstreamFailed,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            Self::InvalidQueryParameter => 400,
            Self::NotFound => 404,
            Self::UpstreamFailed | Self::Internal => 500,
        }
    }
}

/// Wire error envelope; serialized inside `{"error": ...}` by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self {
            code: ApiErrorCode::InvalidQueryParameter,
            message: format!("invalid query parameter: {name}"),
            details: json!({"parameter": name, "value": value}),
        }
    }

    #[must_use]
    pub fn endpoint_not_found() -> Self {
        Self {
            code: ApiErrorCode::NotFound,
            message: "API endpoint not found".to_string(),
            details: json!({}),
        }
    }

    #[must_use]
    pub fn upstream_failed(message: &str, details: Value) -> Self {
        Self {
            code: ApiErrorCode::UpstreamFailed,
            message: message.to_string(),
            details,
        }
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
