use credgate_model::{Record, TABLE_COLUMNS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    /// Index into `TABLE_COLUMNS`. Out-of-range indexes skip sorting.
    pub column: usize,
    pub direction: SortDirection,
}

/// One page request against the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Opaque client correlation token, echoed back unmodified.
    pub draw: Option<String>,
    pub start: usize,
    pub length: usize,
    pub search: String,
    pub order: Option<SortOrder>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            draw: None,
            start: 0,
            length: 10,
            search: String::new(),
            order: None,
        }
    }
}

/// Paging envelope in the DataTables server-side wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableEnvelope {
    pub draw: Option<String>,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    pub data: Vec<Record>,
}

fn matches_search(record: &Record, needle: &str) -> bool {
    record
        .values()
        .any(|value| value.is_some_and(|v| v.to_lowercase().contains(needle)))
}

/// Filter, then stable sort, then slice. Pure over its inputs; identical
/// calls return identical envelopes.
#[must_use]
pub fn query_table(records: &[Record], query: &TableQuery) -> TableEnvelope {
    let mut rows: Vec<&Record> = if query.search.is_empty() {
        records.iter().collect()
    } else {
        let needle = query.search.to_lowercase();
        records
            .iter()
            .filter(|record| matches_search(record, &needle))
            .collect()
    };

    if let Some(order) = query.order {
        if let Some(&column) = TABLE_COLUMNS.get(order.column) {
            // Vec::sort_by is stable; ties keep snapshot order.
            rows.sort_by(|a, b| {
                let left = a.field(column).unwrap_or("").to_lowercase();
                let right = b.field(column).unwrap_or("").to_lowercase();
                match order.direction {
                    SortDirection::Asc => left.cmp(&right),
                    SortDirection::Desc => right.cmp(&left),
                }
            });
        }
    }

    let filtered = rows.len();
    let start = query.start.min(filtered);
    let end = start.saturating_add(query.length).min(filtered);

    TableEnvelope {
        draw: query.draw.clone(),
        records_total: records.len() as u64,
        records_filtered: filtered as u64,
        data: rows[start..end].iter().map(|r| (*r).clone()).collect(),
    }
}
