//! Shared HTTP client construction: retry-on-transient-failure middleware
//! plus a leaky-bucket rate limiter, wrapping a plain `reqwest::Client`.

use std::time::Duration;

use reqwest_leaky_bucket::leaky_bucket::RateLimiter;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

/// Build a middleware-wrapped client: `max_attempts` exponential-backoff
/// retries on transient failures (timeouts, 5xx, 429 honoring
/// `Retry-After`), rate limited to `requests_per_second`.
pub fn build_client(timeout_ms: u64, max_attempts: u32, requests_per_second: usize) -> ClientWithMiddleware {
    let inner = reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .expect("reqwest client configuration is valid");

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_attempts);
    let limiter = RateLimiter::builder()
        .initial(requests_per_second)
        .max(requests_per_second)
        .refill(requests_per_second)
        .interval(Duration::from_secs(1))
        .build();

    ClientBuilder::new(inner)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(reqwest_leaky_bucket::rate_limit_all(limiter))
        .build()
}
