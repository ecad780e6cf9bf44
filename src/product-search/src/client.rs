//! Search endpoint client and response mapping.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::config::SearchConfig;
use crate::error::{ProductSearchError, Result};
use crate::models::{ErrorBody, Product, SearchResponseBody};

/// Typed result of one search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// 2xx with a `results` array, in endpoint order.
    Success(Vec<Product>),
    /// Non-2xx response.
    ServerError { status: u16, message: String },
    /// 2xx whose body is not the expected shape.
    MalformedResponse { detail: String },
    /// The request never produced a response.
    NetworkFailure(String),
}

impl SearchOutcome {
    /// Message for the transient error row, for the failure variants.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            SearchOutcome::ServerError { status, message } => {
                Some(format!("HTTP {status}: {message}"))
            }
            SearchOutcome::NetworkFailure(message) => Some(message.clone()),
            SearchOutcome::Success(_) | SearchOutcome::MalformedResponse { .. } => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Success(results) => write!(f, "{} result(s)", results.len()),
            SearchOutcome::ServerError { status, message } => {
                write!(f, "server error {status}: {message}")
            }
            SearchOutcome::MalformedResponse { detail } => {
                write!(f, "malformed response: {detail}")
            }
            SearchOutcome::NetworkFailure(message) => write!(f, "network failure: {message}"),
        }
    }
}

/// Anything that can answer a product query.
///
/// The component only depends on this trait; [`HttpSearchClient`] is the
/// production implementation.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Run one query. Failures are reported in the outcome, never panicked.
    async fn search(&self, query: &str) -> SearchOutcome;
}

/// Client for the AJAX product search endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    endpoint: Url,
    unknown_error: String,
}

impl HttpSearchClient {
    /// Create a client for `config.search_url`, resolved against `origin`.
    ///
    /// # Arguments
    /// * `origin` - The page origin, e.g. "https://shop.example.com"
    /// * `config` - Resolved component configuration
    pub fn new(origin: &str, config: &SearchConfig) -> Result<Self> {
        Self::with_client(crate::http::create_default_client()?, origin, config)
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_client(
        client: reqwest::Client,
        origin: &str,
        config: &SearchConfig,
    ) -> Result<Self> {
        let origin_url =
            Url::parse(origin).map_err(|e| ProductSearchError::invalid_origin(origin, e))?;
        let endpoint = origin_url
            .join(&config.search_url)
            .map_err(|e| ProductSearchError::invalid_search_url(&config.search_url, e))?;

        Ok(Self {
            client,
            endpoint,
            unknown_error: config.text.unknown_error.clone(),
        })
    }

    /// The resolved endpoint, without the query parameter.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for `query`.
    pub fn search_url(&self, query: &str) -> Url {
        let encoded = format!("q={}", urlencoding::encode(query));
        let mut url = self.endpoint.clone();
        let query_string = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        url.set_query(Some(&query_string));
        url
    }

    async fn send(&self, query: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(self.search_url(query))
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl ProductSource for HttpSearchClient {
    async fn search(&self, query: &str) -> SearchOutcome {
        let response = match self.send(query).await {
            Ok(response) => response,
            Err(e) => return SearchOutcome::NetworkFailure(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| self.unknown_error.clone());
            return SearchOutcome::ServerError {
                status: status.as_u16(),
                message,
            };
        }

        match response.text().await {
            Ok(body) => parse_search_body(&body),
            Err(e) => SearchOutcome::NetworkFailure(e.to_string()),
        }
    }
}

/// Map a 2xx body to an outcome.
pub(crate) fn parse_search_body(body: &str) -> SearchOutcome {
    match serde_json::from_str::<SearchResponseBody>(body) {
        Ok(SearchResponseBody {
            results: Some(results),
        }) => SearchOutcome::Success(results),
        Ok(SearchResponseBody { results: None }) => SearchOutcome::MalformedResponse {
            detail: "response has no `results` field".to_string(),
        },
        Err(e) => SearchOutcome::MalformedResponse {
            detail: ProductSearchError::from(e).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(search_url: &str) -> HttpSearchClient {
        let config = SearchConfig::builder().search_url(search_url).build();
        HttpSearchClient::new("https://shop.example.com/sales/new", &config).expect("client")
    }

    #[test]
    fn test_endpoint_resolved_against_origin() {
        let c = client("/app/search-products-ajax/");
        assert_eq!(
            c.endpoint().as_str(),
            "https://shop.example.com/app/search-products-ajax/"
        );
    }

    #[test]
    fn test_query_is_percent_encoded() {
        let c = client("/app/search-products-ajax/");
        assert_eq!(
            c.search_url("café & co/2").as_str(),
            "https://shop.example.com/app/search-products-ajax/?q=caf%C3%A9%20%26%20co%2F2"
        );
    }

    #[test]
    fn test_query_appended_to_existing_query_string() {
        let c = client("/api/search?store=3");
        assert_eq!(
            c.search_url("ab").as_str(),
            "https://shop.example.com/api/search?store=3&q=ab"
        );
    }

    #[test]
    fn test_invalid_origin() {
        let err = HttpSearchClient::new("not a url", &SearchConfig::default()).unwrap_err();
        assert!(matches!(err, ProductSearchError::InvalidOrigin { .. }));
    }

    #[test]
    fn test_parse_success() {
        let outcome =
            parse_search_body(r#"{"results":[{"id":"7","name":"Widget","price":12.5}]}"#);
        assert_eq!(
            outcome,
            SearchOutcome::Success(vec![Product::new("7", "Widget", 12.5)])
        );
    }

    #[test]
    fn test_parse_missing_results_is_malformed() {
        let outcome = parse_search_body(r#"{"items":[]}"#);
        assert!(matches!(outcome, SearchOutcome::MalformedResponse { .. }));
        assert_eq!(outcome.failure_message(), None);
    }

    #[test]
    fn test_parse_non_json_is_malformed() {
        let outcome = parse_search_body("<html>login</html>");
        assert!(matches!(outcome, SearchOutcome::MalformedResponse { .. }));
    }

    #[test]
    fn test_failure_messages() {
        let server = SearchOutcome::ServerError {
            status: 500,
            message: "Database unavailable".to_string(),
        };
        assert_eq!(
            server.failure_message().as_deref(),
            Some("HTTP 500: Database unavailable")
        );

        let network = SearchOutcome::NetworkFailure("connection refused".to_string());
        assert_eq!(network.failure_message().as_deref(), Some("connection refused"));
        assert_eq!(SearchOutcome::Success(vec![]).failure_message(), None);
    }
}
