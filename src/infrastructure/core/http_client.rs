use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;

/// Builds the shared HTTP client used by both candle providers: bounded
/// connection pool, exponential-backoff retry for transient failures, no
/// per-request retry budget beyond 3 attempts.
pub fn build_client() -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

    let client = Client::builder()
        .pool_max_idle_per_host(5)
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|_| Client::new());

    ClientBuilder::new(client).with(RetryTransientMiddleware::new_with_policy(retry_policy)).build()
}
