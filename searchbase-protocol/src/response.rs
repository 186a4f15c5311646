//! Search response types.
//!
//! A successful search returns one [`SearchPage`]: the total match count, the
//! record range this page covers, and the records themselves. The page is
//! generic over the record type so callers can decode into their own structs
//! (typed mode) or fall back to [`FieldRecord`] (schemaless mode).
//!
//! `range.end` is the authoritative cursor for fetching the next page. Servers
//! are not required to make it equal `range.start + records.len()`, so paging
//! code must advance by `range.end`, never by a locally computed increment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::DynamicValue;

/// Schemaless result record: field name to dynamic value.
pub type FieldRecord = BTreeMap<String, DynamicValue>;

/// The record range covered by one page. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// Offset of the first record in this page.
    pub start: i64,
    /// Offset one past the last record in this page.
    pub end: i64,
}

/// One page of search results.
///
/// The server may name the record list either `"records"` or `"results"`;
/// both decode into [`SearchPage::records`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<R = FieldRecord> {
    /// Total number of records matching the query, across all pages.
    pub total: u64,
    /// The range of the overall result set this page covers.
    pub range: PageRange,
    /// The records in this page.
    #[serde(alias = "results")]
    pub records: Vec<R>,
}

/// Structured error body returned by the server for 4xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error description.
    pub message: String,
}
