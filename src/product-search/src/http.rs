//! HTTP client factory for the search endpoint.
//!
//! All clients include: User-Agent, a cookie store (so same-origin session
//! cookies travel with each request), tcp_nodelay, and bounded timeouts.

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProductSearchError, Result};

/// User-Agent string for search requests
pub const USER_AGENT: &str = concat!("product-search/", env!("CARGO_PKG_VERSION"));

/// Default timeout for a search request (10 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection pool idle timeout so DNS is re-resolved periodically.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates a search client with the default timeout.
pub fn create_default_client() -> Result<Client> {
    create_client_with_timeout(DEFAULT_TIMEOUT)
}

/// Creates a search client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client> {
    create_client_builder()
        .timeout(timeout)
        .read_timeout(timeout)
        .build()
        .map_err(|e| ProductSearchError::HttpClient(e.to_string()))
}

/// Creates a client builder with the standard configuration.
///
/// Use this when the host needs to customise the client further, e.g. to
/// install a proxy or extra root certificates.
pub fn create_client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .timeout(DEFAULT_TIMEOUT)
        .read_timeout(DEFAULT_TIMEOUT)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_client_succeeds() {
        let result = create_default_client();
        assert!(result.is_ok(), "create_default_client should succeed");
    }

    #[test]
    fn test_create_client_with_timeout_succeeds() {
        let result = create_client_with_timeout(Duration::from_secs(2));
        assert!(result.is_ok(), "create_client_with_timeout should succeed");
    }

    #[test]
    fn test_user_agent_constant_is_set() {
        assert!(
            USER_AGENT.starts_with("product-search/"),
            "USER_AGENT should name the crate"
        );
    }
}
