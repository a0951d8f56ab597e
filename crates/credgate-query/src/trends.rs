use crate::group_key;
use chrono::NaiveDate;
use credgate_model::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-month rollup keyed by `"YYYY-MM"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MonthlyBucket {
    pub newly_certified: BTreeMap<String, u64>,
    pub lapsed: u64,
    pub expired: u64,
    pub ethics_violations: u64,
}

/// Month key is the raw first seven characters of the date cell. Malformed
/// upstream dates produce malformed keys rather than being rejected; such
/// keys never collide with a real month.
fn month_key(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.chars().take(7).collect())
}

/// Buckets the snapshot by issue and expiration month.
///
/// `now` is the evaluation instant injected by the caller; this crate never
/// reads the wall clock. The returned map iterates in ascending month-key
/// order, which is chronological for well-formed keys.
#[must_use]
pub fn build_monthly_trends(records: &[Record], now: NaiveDate) -> BTreeMap<String, MonthlyBucket> {
    let current_month = now.format("%Y-%m").to_string();
    let mut buckets: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

    for record in records {
        let issue_month = month_key(record.issue_date.as_deref());
        let exp_month = month_key(record.exp_date.as_deref());
        let status = record.status.as_deref();

        if let Some(month) = &issue_month {
            let credential = group_key(record.credential.as_deref());
            let bucket = buckets.entry(month.clone()).or_default();
            *bucket
                .newly_certified
                .entry(credential.to_string())
                .or_insert(0) += 1;
        }

        if let Some(month) = &exp_month {
            let bucket = buckets.entry(month.clone()).or_default();
            if *month == current_month && status != Some("Active") {
                bucket.expired += 1;
            }
            if status.is_some_and(|s| s.to_lowercase().contains("lapsed")) {
                bucket.lapsed += 1;
            }
        }

        if status.is_some_and(|s| s.to_lowercase().contains("ethics")) {
            let month = issue_month.unwrap_or_else(|| current_month.clone());
            buckets.entry(month).or_default().ethics_violations += 1;
        }
    }

    buckets
}
