//! Wire contract for the Searchbase search service.
//!
//! This crate defines the types exchanged with a Searchbase HTTP endpoint:
//!
//! - [`DynamicValue`]: tagged union over the six JSON value kinds, used for
//!   opaque filter values and schemaless result records
//! - [`SearchQuery`] / [`SearchRequest`]: the query model and its
//!   `{"query": {...}}` request envelope
//! - [`SearchPage`]: one page of results with total count and range metadata
//!
//! These types are shared by HTTP clients and any service-side code that
//! speaks the same protocol. The crate is transport-agnostic: it only knows
//! how values look on the wire, not how they travel.
//!
//! # Example
//!
//! ```rust
//! use searchbase_protocol::{Filter, SearchQuery, SortSpec};
//!
//! let query = SearchQuery::new("products")
//!     .with_filter(Filter::new("inStock", "eq", true))
//!     .with_sort(SortSpec::descending("price"))
//!     .with_limit(20);
//!
//! let body = serde_json::to_string(&query).unwrap();
//! assert!(body.contains("\"index\":\"products\""));
//! ```

mod error;
mod query;
mod response;
mod value;

pub use error::{Result, ValueError};
pub use query::{Filter, SearchQuery, SearchRequest, SortDirection, SortSpec};
pub use response::{ApiErrorBody, FieldRecord, PageRange, SearchPage};
pub use value::DynamicValue;
