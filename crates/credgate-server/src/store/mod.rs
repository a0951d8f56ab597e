use async_trait::async_trait;
use credgate_model::Record;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod backends;

pub use backends::TableApiBackend;

/// Failure talking to the upstream data service: either a non-success
/// response (status retained) or a transport-level error (no status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    #[must_use]
    pub fn status(status: u16, body: String) -> Self {
        Self {
            status: Some(status),
            message: format!("upstream responded with status {status}: {body}"),
        }
    }

    #[must_use]
    pub fn transport(message: String) -> Self {
        Self {
            status: None,
            message,
        }
    }
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
impl std::error::Error for UpstreamError {}

/// One snapshot read against the upstream table. Implementations make at
/// most one outbound call per invocation and never retry.
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn fetch_records(&self) -> Result<Vec<Record>, UpstreamError>;
}

/// In-memory source for tests: serves a fixed snapshot or a forced failure,
/// and counts fetches so tests can assert when no upstream call was made.
#[derive(Debug, Default)]
pub struct FakeRecordSource {
    pub records: Vec<Record>,
    pub fail_with: Option<UpstreamError>,
    pub fetches: AtomicU64,
}

impl FakeRecordSource {
    #[must_use]
    pub fn serving(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing(error: UpstreamError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordSource for FakeRecordSource {
    fn backend_tag(&self) -> &'static str {
        "fake"
    }

    async fn fetch_records(&self) -> Result<Vec<Record>, UpstreamError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(self.records.clone()),
        }
    }
}
