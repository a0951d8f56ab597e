use crate::serde_helpers::lenient_scalar;
use serde::{Deserialize, Serialize};

/// Group key substituted when a grouping field is absent or null.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Fixed column order for the table feed. Client-side sort requests address
/// columns by index into this list.
pub const TABLE_COLUMNS: [&str; 11] = [
    "Id",
    "SCRAPE ORDER",
    "NAME",
    "CITY",
    "CREDENTIAL",
    "NUMBER",
    "ISSUE DATE",
    "EXP DATE",
    "STATUS",
    "COUNTY",
    "REGION",
];

/// One certification entry as returned by the upstream table.
///
/// All fields are optional; the upstream source does not guarantee presence
/// or type of any column. Scalar cells of any JSON type fold to strings at
/// this boundary, and unknown columns are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Record {
    #[serde(rename = "Id", default, with = "lenient_scalar")]
    pub id: Option<String>,
    #[serde(rename = "SCRAPE ORDER", default, with = "lenient_scalar")]
    pub scrape_order: Option<String>,
    #[serde(rename = "NAME", default, with = "lenient_scalar")]
    pub name: Option<String>,
    #[serde(rename = "CITY", default, with = "lenient_scalar")]
    pub city: Option<String>,
    #[serde(rename = "CREDENTIAL", default, with = "lenient_scalar")]
    pub credential: Option<String>,
    #[serde(rename = "NUMBER", default, with = "lenient_scalar")]
    pub number: Option<String>,
    #[serde(rename = "ISSUE DATE", default, with = "lenient_scalar")]
    pub issue_date: Option<String>,
    #[serde(rename = "EXP DATE", default, with = "lenient_scalar")]
    pub exp_date: Option<String>,
    #[serde(rename = "STATUS", default, with = "lenient_scalar")]
    pub status: Option<String>,
    #[serde(rename = "COUNTY", default, with = "lenient_scalar")]
    pub county: Option<String>,
    #[serde(rename = "REGION", default, with = "lenient_scalar")]
    pub region: Option<String>,
}

impl Record {
    /// Field value addressed by upstream column name. Unknown columns
    /// resolve to `None`, same as an absent cell.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            "Id" => self.id.as_deref(),
            "SCRAPE ORDER" => self.scrape_order.as_deref(),
            "NAME" => self.name.as_deref(),
            "CITY" => self.city.as_deref(),
            "CREDENTIAL" => self.credential.as_deref(),
            "NUMBER" => self.number.as_deref(),
            "ISSUE DATE" => self.issue_date.as_deref(),
            "EXP DATE" => self.exp_date.as_deref(),
            "STATUS" => self.status.as_deref(),
            "COUNTY" => self.county.as_deref(),
            "REGION" => self.region.as_deref(),
            _ => None,
        }
    }

    /// All cell values in `TABLE_COLUMNS` order.
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        TABLE_COLUMNS.into_iter().map(|column| self.field(column))
    }
}
