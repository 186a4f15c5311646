//! Integration tests for `SearchClient` against a scripted mock transport.
//!
//! The mock records every request and replays a fixed script of responses,
//! so tests can assert both the wire shape of outgoing requests and the
//! client's handling of every response class.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;

use searchbase_client::{
    BoxError, ClientError, DynamicValue, Filter, HttpResponse, HttpTransport, SearchClient,
    SearchQuery,
};

#[derive(Debug, Clone)]
struct RecordedRequest {
    url: String,
    token: String,
    body: serde_json::Value,
}

#[derive(Default)]
struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    script: Mutex<VecDeque<Result<HttpResponse, String>>>,
}

impl MockTransport {
    fn scripted(responses: impl IntoIterator<Item = Result<HttpResponse, String>>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(responses.into_iter().collect()),
        })
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            token: token.to_string(),
            body: serde_json::from_str(&body).expect("request body must be JSON"),
        });
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => panic!("no scripted response left for request to {url}"),
        }
    }
}

fn ok(body: serde_json::Value) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status: 200,
        body: body.to_string(),
    })
}

fn status(code: u16, body: &str) -> Result<HttpResponse, String> {
    Ok(HttpResponse {
        status: code,
        body: body.to_string(),
    })
}

/// A page of `count` records numbered from `start`, covering `start..end`.
fn page(total: u64, start: i64, end: i64, count: usize) -> serde_json::Value {
    let records: Vec<_> = (0..count)
        .map(|i| json!({"n": start + i as i64}))
        .collect();
    json!({"total": total, "range": {"start": start, "end": end}, "records": records})
}

fn client(transport: &Arc<MockTransport>) -> SearchClient<Arc<MockTransport>> {
    SearchClient::with_transport(transport.clone(), "http://localhost:9090", "test-token")
}

#[tokio::test]
async fn search_sends_expected_request_shape() {
    let transport = MockTransport::scripted([ok(page(0, 0, 0, 0))]);
    let query = SearchQuery::new("products").with_filter(Filter::new("inStock", "eq", true));

    client(&transport).search(&query).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://localhost:9090/search");
    assert_eq!(requests[0].token, "test-token");

    let body = &requests[0].body;
    assert_eq!(body["query"]["index"], "products");
    assert_eq!(body["query"]["filters"][0]["operator"], "eq");
    // Unset optional fields must be absent, not null.
    let query_obj = body["query"].as_object().unwrap();
    assert!(!query_obj.contains_key("limit"));
    assert!(!query_obj.contains_key("offset"));
    assert!(!query_obj.contains_key("sort"));
    assert!(!query_obj.contains_key("select"));
}

#[tokio::test]
async fn search_decodes_schemaless_records() {
    let transport = MockTransport::scripted([ok(json!({
        "total": 1,
        "range": {"start": 0, "end": 1},
        "records": [{"id": "1", "fields": {"name": "Test", "price": 99.99, "inStock": true}}]
    }))]);

    let page = client(&transport)
        .search(&SearchQuery::new("products"))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    let fields = page.records[0].get("fields").unwrap();
    assert_eq!(fields.get("price").and_then(DynamicValue::as_f64), Some(99.99));
    assert_eq!(fields.get("inStock").and_then(DynamicValue::as_bool), Some(true));
}

#[tokio::test]
async fn search_decodes_typed_records() {
    #[derive(Debug, Deserialize)]
    struct Product {
        id: String,
        fields: Fields,
    }
    #[derive(Debug, Deserialize)]
    struct Fields {
        name: String,
        price: f64,
        #[serde(rename = "inStock")]
        in_stock: bool,
    }

    let transport = MockTransport::scripted([ok(json!({
        "total": 1,
        "range": {"start": 0, "end": 1},
        "records": [{"id": "1", "fields": {"name": "Test", "price": 99.99, "inStock": true}}]
    }))]);

    let page = client(&transport)
        .search_as::<Product>(&SearchQuery::new("products"))
        .await
        .unwrap();

    assert_eq!(page.records[0].id, "1");
    assert_eq!(page.records[0].fields.name, "Test");
    assert_eq!(page.records[0].fields.price, 99.99);
    assert!(page.records[0].fields.in_stock);
}

#[tokio::test]
async fn search_surfaces_api_error_message() {
    let transport = MockTransport::scripted([status(404, r#"{"message": "index not found"}"#)]);

    let err = client(&transport)
        .search(&SearchQuery::new("missing"))
        .await
        .unwrap_err();

    match err {
        ClientError::Api(message) => assert_eq!(message, "index not found"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn search_reports_unparseable_4xx_as_unexpected_status() {
    let transport = MockTransport::scripted([status(404, "<html>gone</html>")]);

    let err = client(&transport)
        .search(&SearchQuery::new("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedStatus(404)));
}

#[tokio::test]
async fn search_reports_5xx_as_unexpected_status() {
    let transport = MockTransport::scripted([status(503, "try later")]);

    let err = client(&transport)
        .search(&SearchQuery::new("products"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedStatus(503)));
}

#[tokio::test]
async fn search_rejects_undecodable_2xx_body() {
    // A 2xx body that is not a page must fail, never become an empty page.
    let transport = MockTransport::scripted([status(200, r#"{"unexpected": true}"#)]);

    let err = client(&transport)
        .search(&SearchQuery::new("products"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ResponseDecoding(_)));
}

#[tokio::test]
async fn search_wraps_transport_failure() {
    let transport = MockTransport::scripted([Err("connection refused".to_string())]);

    let err = client(&transport)
        .search(&SearchQuery::new("products"))
        .await
        .unwrap_err();

    match &err {
        ClientError::Transport(cause) => {
            assert!(cause.to_string().contains("connection refused"));
        }
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn search_rejects_non_finite_filter_value() {
    let transport = MockTransport::scripted([]);
    let query =
        SearchQuery::new("products").with_filter(Filter::new("price", "gte", f64::NAN));

    let err = client(&transport).search(&query).await.unwrap_err();

    assert!(matches!(err, ClientError::Value(_)));
    // The request must never have reached the transport.
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn search_all_fetches_until_total() {
    let transport = MockTransport::scripted([
        ok(page(250, 0, 100, 100)),
        ok(page(250, 100, 200, 100)),
        ok(page(250, 200, 250, 50)),
    ]);
    let searcher = client(&transport);

    let mut batches = Vec::new();
    {
        let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));
        while let Some(batch) = stream.next().await {
            batches.push(batch.unwrap());
        }
    }

    let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    let offsets: Vec<_> = requests
        .iter()
        .map(|r| r.body["query"]["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, vec![0, 100, 200]);
    for request in &requests {
        assert_eq!(request.body["query"]["limit"], 100);
    }
}

#[tokio::test]
async fn search_all_advances_by_server_range_end_not_local_count() {
    // The server skips ahead: page 1 covers 0..150 despite returning 100
    // records. The next fetch must start at 150, not at 100.
    let transport = MockTransport::scripted([
        ok(page(200, 0, 150, 100)),
        ok(page(200, 150, 200, 50)),
    ]);
    let searcher = client(&transport);

    let mut sizes = Vec::new();
    {
        let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));
        while let Some(batch) = stream.next().await {
            sizes.push(batch.unwrap().len());
        }
    }

    assert_eq!(sizes, vec![100, 50]);
    let offsets: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.body["query"]["offset"].as_u64().unwrap())
        .collect();
    assert_eq!(offsets, vec![0, 150]);
}

#[tokio::test]
async fn search_all_terminates_on_stalled_cursor() {
    // Server bug: the second page reports the same range.end as the first.
    let transport = MockTransport::scripted([
        ok(page(300, 0, 100, 100)),
        ok(page(300, 0, 100, 100)),
    ]);
    let searcher = client(&transport);

    let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.len(), 100);

    let second = stream.next().await.unwrap();
    match second {
        Err(ClientError::PaginationStalled { offset }) => assert_eq!(offset, 100),
        other => panic!("expected PaginationStalled, got {other:?}"),
    }

    assert!(stream.next().await.is_none());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn search_all_yields_prior_batches_then_error_then_end() {
    let transport = MockTransport::scripted([
        ok(page(300, 0, 100, 100)),
        status(500, "boom"),
    ]);
    let searcher = client(&transport);

    let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.len(), 100);

    let second = stream.next().await.unwrap();
    assert!(matches!(second, Err(ClientError::UnexpectedStatus(500))));

    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn search_all_starts_at_query_offset() {
    let transport = MockTransport::scripted([ok(page(100, 50, 100, 50))]);
    let searcher = client(&transport);

    let mut sizes = Vec::new();
    {
        let query = SearchQuery::new("products").with_offset(50);
        let mut stream = std::pin::pin!(searcher.search_all(query, 100));
        while let Some(batch) = stream.next().await {
            sizes.push(batch.unwrap().len());
        }
    }

    assert_eq!(sizes, vec![50]);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["query"]["offset"], 50);
}

#[tokio::test]
async fn search_all_stops_once_total_is_reached() {
    // 90 matches with a batch size of 100: one fetch, no second request.
    let transport = MockTransport::scripted([ok(page(90, 0, 90, 90))]);
    let searcher = client(&transport);

    let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));
    assert_eq!(stream.next().await.unwrap().unwrap().len(), 90);
    assert!(stream.next().await.is_none());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn search_all_is_pull_based() {
    // Only one response is scripted; dropping the stream after the first
    // batch must leave the remaining pages unfetched.
    let transport = MockTransport::scripted([ok(page(1000, 0, 100, 100))]);
    let searcher = client(&transport);

    {
        let mut stream = std::pin::pin!(searcher.search_all(SearchQuery::new("products"), 100));
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 100);
    }

    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn search_all_decodes_typed_batches() {
    #[derive(Debug, Deserialize)]
    struct Numbered {
        n: i64,
    }

    let transport = MockTransport::scripted([
        ok(page(3, 0, 2, 2)),
        ok(page(3, 2, 3, 1)),
    ]);
    let searcher = client(&transport);

    let mut numbers = Vec::new();
    {
        let mut stream =
            std::pin::pin!(searcher.search_all_as::<Numbered>(SearchQuery::new("products"), 2));
        while let Some(batch) = stream.next().await {
            numbers.extend(batch.unwrap().into_iter().map(|r| r.n));
        }
    }

    assert_eq!(numbers, vec![0, 1, 2]);
}
