//! Shared HTTP client for every outbound integration.

use std::time::Duration;

const USER_AGENT: &str = concat!("neighborly-assist/", env!("CARGO_PKG_VERSION"));

/// One client (and connection pool) with a request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
