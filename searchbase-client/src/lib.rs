//! HTTP client for the Searchbase search service.
//!
//! This crate provides [`SearchClient`], which issues search queries against
//! a remote Searchbase endpoint and handles multi-page result sets:
//!
//! - [`SearchClient::search`]: one bounded request, one [`SearchPage`]
//! - [`SearchClient::search_all`]: a lazy pull-based stream of record
//!   batches that drives pagination to exhaustion using the server-reported
//!   `range.end` cursor
//!
//! The networking stack is abstracted behind the [`HttpTransport`] trait;
//! [`ReqwestTransport`] is the default implementation. Retry policy is
//! deliberately out of scope: every failure is terminal for the current
//! operation and surfaced as a [`ClientError`].
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use searchbase_client::SearchClient;
//! use searchbase_protocol::{Filter, SearchQuery};
//!
//! let client = SearchClient::new("http://search.example.com:9090", "my-token");
//! let query = SearchQuery::new("products").with_filter(Filter::new("inStock", "eq", true));
//!
//! // Single page
//! let page = client.search(&query).await?;
//! println!("{} of {} records", page.records.len(), page.total);
//!
//! // All pages, 100 records per fetch
//! let mut batches = std::pin::pin!(client.search_all(query, 100));
//! while let Some(batch) = batches.next().await {
//!     for record in batch? {
//!         println!("{record:?}");
//!     }
//! }
//! ```

mod client;
mod error;
mod transport;

pub use client::SearchClient;
pub use error::{BoxError, ClientError, Result};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TOKEN_HEADER};

pub use searchbase_protocol::{
    ApiErrorBody, DynamicValue, FieldRecord, Filter, PageRange, SearchPage, SearchQuery,
    SearchRequest, SortDirection, SortSpec, ValueError,
};
