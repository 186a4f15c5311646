//! Search query types.
//!
//! A [`SearchQuery`] is an immutable value object describing one search
//! against a named index. Filter operators, sort fields, and field selection
//! are opaque to this crate: they are serialized verbatim and interpreted by
//! the server.
//!
//! Every optional field uses include-if-present semantics on the wire: an
//! unset field is omitted from the payload entirely, never sent as `null`.

use serde::{Deserialize, Serialize};

use crate::value::DynamicValue;

/// A single filter clause, passed through to the server uninterpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field the filter applies to.
    pub field: String,
    /// Operator token (e.g. "eq", "gte"). Not validated client-side.
    pub operator: String,
    /// Comparison value.
    pub value: DynamicValue,
}

impl Filter {
    /// Create a new filter clause.
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<DynamicValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for a [`SortSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order.
    #[serde(rename = "desc")]
    Descending,
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort ascending by `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort descending by `field`.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A search query against a named index.
///
/// `limit` and `offset` are overwritten by the client's pagination engine when
/// the query is used in streaming mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Name of the index to search.
    pub index: String,

    /// Filter clauses, applied server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,

    /// Sort criteria, applied in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortSpec>>,

    /// Fields to include in result records; all fields if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,

    /// Maximum number of records to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Number of records to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl SearchQuery {
    /// Create a query against `index` with no filters, sort, or paging.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            filters: None,
            sort: None,
            select: None,
            limit: None,
            offset: None,
        }
    }

    /// Append a filter clause.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Append a sort criterion.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.get_or_insert_with(Vec::new).push(sort);
        self
    }

    /// Restrict result records to the given fields.
    pub fn with_select(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Set the record limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the record offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Request envelope for the `/search` endpoint: `{"query": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query to execute.
    pub query: SearchQuery,
}

impl SearchRequest {
    /// Wrap a query in the request envelope.
    pub fn new(query: SearchQuery) -> Self {
        Self { query }
    }
}
