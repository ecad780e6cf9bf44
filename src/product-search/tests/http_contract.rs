use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use product_search::{HttpSearchClient, Product, ProductSource, SearchConfig, SearchOutcome};

const ENDPOINT: &str = "/app/search-products-ajax/";

fn client_for(server: &MockServer) -> HttpSearchClient {
    HttpSearchClient::new(&server.uri(), &SearchConfig::default()).expect("client")
}

#[tokio::test]
async fn test_success_sends_ajax_headers_and_encoded_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("q", "wid & co"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": "7", "name": "Widget", "price": 12.5},
                {"id": 8, "name": "Widget XL", "price": "19.90"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).search("wid & co").await;
    assert_eq!(
        outcome,
        SearchOutcome::Success(vec![
            Product::new("7", "Widget", 12.5),
            Product::new("8", "Widget XL", 19.9),
        ])
    );
}

#[tokio::test]
async fn test_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let outcome = client_for(&server).search("zz").await;
    assert_eq!(outcome, SearchOutcome::Success(Vec::new()));
}

#[tokio::test]
async fn test_server_error_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Database unavailable"})),
        )
        .mount(&server)
        .await;

    let outcome = client_for(&server).search("ab").await;
    assert_eq!(
        outcome,
        SearchOutcome::ServerError {
            status: 500,
            message: "Database unavailable".to_string(),
        }
    );
    assert_eq!(
        outcome.failure_message().as_deref(),
        Some("HTTP 500: Database unavailable")
    );
}

#[tokio::test]
async fn test_server_error_without_body_uses_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let outcome = client_for(&server).search("ab").await;
    assert_eq!(
        outcome,
        SearchOutcome::ServerError {
            status: 403,
            message: "Unknown error".to_string(),
        }
    );
}

#[tokio::test]
async fn test_missing_results_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(&server)
        .await;

    let outcome = client_for(&server).search("ab").await;
    assert!(matches!(outcome, SearchOutcome::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_custom_endpoint_keeps_existing_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("store", "3"))
        .and(query_param("q", "ab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = SearchConfig::builder()
        .search_url("/api/products?store=3")
        .build();
    let client = HttpSearchClient::new(&server.uri(), &config).expect("client");
    assert_eq!(client.search("ab").await, SearchOutcome::Success(Vec::new()));
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let uri = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let client = HttpSearchClient::new(&uri, &SearchConfig::default()).expect("client");
    let outcome = client.search("ab").await;
    assert!(matches!(outcome, SearchOutcome::NetworkFailure(_)));
    assert!(outcome.failure_message().is_some());
}
