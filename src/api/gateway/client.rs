//! reqwest client construction shared by the gateway implementations.

use std::time::Duration;

use reqwest::Client;

use crate::api::error::ReviewError;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Builds an HTTP client whose requests fail with
/// [`ReviewError::Timeout`] once `timeout` elapses.
///
/// # Errors
///
/// Returns [`ReviewError::Configuration`] when the TLS backend cannot be
/// initialised.
pub fn build_http_client(timeout: Duration) -> Result<Client, ReviewError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("junket/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|error| ReviewError::Configuration {
            message: format!("failed to configure HTTP client: {error}"),
        })
}
