//! Error types for the product search component.

/// Result type alias for product search operations.
pub type Result<T> = std::result::Result<T, ProductSearchError>;

/// Errors raised while constructing the search client.
///
/// Runtime failures of an individual query are never reported through this
/// type; they become a [`SearchOutcome`](crate::SearchOutcome) and are shown
/// to the user as a transient message.
#[derive(Debug, thiserror::Error)]
pub enum ProductSearchError {
    /// The origin the endpoint is resolved against is not an absolute URL.
    #[error("Invalid origin URL '{url}': {source}")]
    InvalidOrigin {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The configured search endpoint could not be joined onto the origin.
    #[error("Invalid search URL '{url}': {source}")]
    InvalidSearchUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// The request failed at the transport level.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProductSearchError {
    /// Creates a new `InvalidOrigin` error.
    pub fn invalid_origin(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidOrigin {
            url: url.into(),
            source,
        }
    }

    /// Creates a new `InvalidSearchUrl` error.
    pub fn invalid_search_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidSearchUrl {
            url: url.into(),
            source,
        }
    }
}
