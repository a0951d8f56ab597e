#![forbid(unsafe_code)]

pub mod record;
pub mod serde_helpers;

pub use record::{Record, TABLE_COLUMNS, UNKNOWN_GROUP};

pub const CRATE_NAME: &str = "credgate-model";
