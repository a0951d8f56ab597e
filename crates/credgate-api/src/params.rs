// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use credgate_query::{SortDirection, SortOrder, TableQuery};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Parses the DataTables-style query surface of `/api/table-data`.
///
/// Absent parameters take their defaults; present-but-malformed values are
/// rejected rather than silently coerced.
pub fn parse_table_params(query: &BTreeMap<String, String>) -> Result<TableQuery, ApiError> {
    let start = parse_offset(query, "start", 0)?;
    let length = parse_offset(query, "length", DEFAULT_PAGE_LENGTH)?;
    let search = query.get("search[value]").cloned().unwrap_or_default();

    Ok(TableQuery {
        draw: query.get("draw").cloned(),
        start,
        length,
        search,
        order: parse_order(query)?,
    })
}

fn parse_offset(
    query: &BTreeMap<String, String>,
    name: &str,
    default: usize,
) -> Result<usize, ApiError> {
    match query.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param(name, raw)),
    }
}

/// Sorting engages only when both the column index and the direction are
/// present. An out-of-range index is accepted here and skipped by the
/// engine; a malformed index or unknown direction is a caller error.
fn parse_order(query: &BTreeMap<String, String>) -> Result<Option<SortOrder>, ApiError> {
    let column = match query.get("order[0][column]") {
        None => return Ok(None),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param("order[0][column]", raw))?,
    };
    let direction = match query.get("order[0][dir]").map(String::as_str) {
        None => return Ok(None),
        Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => return Err(ApiError::invalid_param("order[0][dir]", other)),
    };
    Ok(Some(SortOrder { column, direction }))
}
