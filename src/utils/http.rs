//! HTTP Client construction
//!
//! One `reqwest` client per RPC client instance, so connections to the
//! fullnode are pooled for the lifetime of the adapter that owns it.
//! No retries are layered on top; failures surface to the caller as-is.

use reqwest::Client;
use std::time::Duration;

use crate::error::{WalletError, WalletResult};

pub const USER_AGENT: &str = concat!("Sui-Wallet/", env!("CARGO_PKG_VERSION"));

/// Build the async HTTP client used for JSON-RPC and faucet calls
///
/// `timeout` of `None` leaves requests unbounded.
pub fn build_client(timeout: Option<Duration>) -> WalletResult<Client> {
    let mut builder = Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(5)
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(USER_AGENT);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout).connect_timeout(timeout.min(Duration::from_secs(10)));
    }

    builder
        .build()
        .map_err(|e| WalletError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Extract the host part of a URL for log lines
pub fn extract_domain(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or(url)
        .to_string()
}
