//! Paginated search client.
//!
//! [`SearchClient`] issues search requests against a Searchbase endpoint.
//! It exposes a bounded single-page [`search`](SearchClient::search) and a
//! lazy streaming [`search_all`](SearchClient::search_all) that drives
//! pagination until the server-reported total is exhausted.
//!
//! The stream is pull-based: each poll performs at most one page fetch, so a
//! consumer that stops pulling stops all network activity. Cancellation
//! granularity is one page; in-flight requests are not aborted mid-flight.

use futures::stream::{self, Stream};
use searchbase_protocol::{
    ApiErrorBody, FieldRecord, SearchPage, SearchQuery, SearchRequest, ValueError,
};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Client for a Searchbase search endpoint.
///
/// Configuration is immutable after construction, so concurrent calls on the
/// same instance are safe; no state is shared between invocations.
pub struct SearchClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    endpoint: String,
    token: String,
}

impl SearchClient<ReqwestTransport> {
    /// Create a client for `endpoint` using the default reqwest transport.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_transport(ReqwestTransport::new(), endpoint, token)
    }
}

impl<T: HttpTransport> SearchClient<T> {
    /// Create a client with an injected transport.
    pub fn with_transport(
        transport: T,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.into(),
            transport,
        }
    }

    /// The configured base endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one search and return a single page of schemaless records.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        self.search_as(query).await
    }

    /// Execute one search, decoding records into a caller-supplied type.
    pub async fn search_as<R: DeserializeOwned>(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchPage<R>> {
        if let Some(filters) = &query.filters {
            for filter in filters {
                filter.value.check_encodable()?;
            }
        }

        let url = format!("{}/search", self.endpoint);
        let body = serde_json::to_string(&SearchRequest::new(query.clone()))
            .map_err(|e| ClientError::Value(ValueError::MalformedPayload(e)))?;

        tracing::debug!(
            url = %url,
            index = %query.index,
            limit = ?query.limit,
            offset = ?query.offset,
            "sending search request"
        );

        let response = self
            .transport
            .post_json(&url, &self.token, body)
            .await
            .map_err(ClientError::Transport)?;

        match response.status {
            200..=299 => {
                let page: SearchPage<R> = serde_json::from_str(&response.body)
                    .map_err(ClientError::ResponseDecoding)?;
                tracing::debug!(
                    total = page.total,
                    returned = page.records.len(),
                    range_end = page.range.end,
                    "search page received"
                );
                Ok(page)
            }
            400..=499 => match serde_json::from_str::<ApiErrorBody>(&response.body) {
                Ok(error_body) => Err(ClientError::Api(error_body.message)),
                Err(_) => Err(ClientError::UnexpectedStatus(response.status)),
            },
            status => Err(ClientError::UnexpectedStatus(status)),
        }
    }

    /// Stream all matching records as batches of schemaless records.
    ///
    /// See [`search_all_as`](Self::search_all_as) for semantics.
    pub fn search_all(
        &self,
        query: SearchQuery,
        batch_size: u64,
    ) -> impl Stream<Item = Result<Vec<FieldRecord>>> + '_ {
        self.search_all_as(query, batch_size)
    }

    /// Stream all matching records as typed batches, one batch per page.
    ///
    /// Pagination starts at the query's `offset` (or 0) and advances to the
    /// server-reported `range.end` after every page; `limit` and `offset` on
    /// the given query are overwritten per fetch. The stream ends once the
    /// number of fetched records, or the consumed range, reaches the
    /// server-reported total.
    ///
    /// Each poll performs at most one page fetch, so pacing is fully under
    /// the consumer's control. A fetch failure is yielded as the final item
    /// and ends the stream; batches already yielded remain valid.
    ///
    /// If the server returns a page whose `range.end` does not advance the
    /// cursor while more records are still owed, the stream ends with
    /// [`ClientError::PaginationStalled`] instead of refetching the same
    /// range indefinitely.
    pub fn search_all_as<R: DeserializeOwned>(
        &self,
        query: SearchQuery,
        batch_size: u64,
    ) -> impl Stream<Item = Result<Vec<R>>> + '_ {
        let start = PageCursor {
            offset: query.offset.unwrap_or(0),
            fetched: 0,
        };

        stream::unfold(Some(start), move |cursor| {
            let mut page_query = query.clone();
            async move {
                let cursor = cursor?;
                page_query.limit = Some(batch_size);
                page_query.offset = Some(cursor.offset);

                let page = match self.search_as::<R>(&page_query).await {
                    Ok(page) => page,
                    Err(e) => return Some((Err(e), None)),
                };

                let fetched = cursor.fetched + page.records.len() as u64;
                // Exhausted either when this stream has fetched every match
                // or when the consumed range has reached the reported total
                // (the latter matters when the query started at an offset).
                if fetched >= page.total || page.range.end >= page.total as i64 {
                    return Some((Ok(page.records), None));
                }

                if page.range.end <= cursor.offset as i64 {
                    tracing::warn!(
                        offset = cursor.offset,
                        range_end = page.range.end,
                        "server cursor did not advance, aborting pagination"
                    );
                    return Some((
                        Err(ClientError::PaginationStalled {
                            offset: cursor.offset,
                        }),
                        None,
                    ));
                }

                let next = PageCursor {
                    offset: page.range.end as u64,
                    fetched,
                };
                Some((Ok(page.records), Some(next)))
            }
        })
    }
}

impl<T: HttpTransport> std::fmt::Debug for SearchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &!self.token.is_empty())
            .finish()
    }
}

/// Pagination state carried between page fetches.
#[derive(Debug, Clone, Copy)]
struct PageCursor {
    /// Offset to request the next page at.
    offset: u64,
    /// Records fetched so far across all pages.
    fetched: u64,
}
