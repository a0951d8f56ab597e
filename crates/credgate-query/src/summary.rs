use crate::group_key;
use credgate_model::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts over one snapshot. Rebuilt per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Summary {
    pub total: u64,
    pub by_credential: BTreeMap<String, u64>,
    pub by_county: BTreeMap<String, u64>,
    pub by_city: BTreeMap<String, u64>,
}

/// Single pass over the snapshot; each grouping counts every record exactly
/// once, with absent cells under `"Unknown"`.
#[must_use]
pub fn summarize(records: &[Record]) -> Summary {
    let mut summary = Summary {
        total: records.len() as u64,
        ..Summary::default()
    };
    for record in records {
        let credential = group_key(record.credential.as_deref());
        let county = group_key(record.county.as_deref());
        let city = group_key(record.city.as_deref());
        *summary
            .by_credential
            .entry(credential.to_string())
            .or_insert(0) += 1;
        *summary.by_county.entry(county.to_string()).or_insert(0) += 1;
        *summary.by_city.entry(city.to_string()).or_insert(0) += 1;
    }
    summary
}
