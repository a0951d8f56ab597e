#![forbid(unsafe_code)]

pub mod summary;
pub mod table;
pub mod trends;

pub use summary::{summarize, Summary};
pub use table::{query_table, SortDirection, SortOrder, TableEnvelope, TableQuery};
pub use trends::{build_monthly_trends, MonthlyBucket};

pub const CRATE_NAME: &str = "credgate-query";

/// Grouping fields fall back to a literal key when the cell is absent.
pub(crate) fn group_key(value: Option<&str>) -> &str {
    value.unwrap_or(credgate_model::UNKNOWN_GROUP)
}
