//! HTTP client module
//!
//! Provides the HTTP client used to talk to the listing endpoint.
//!
//! # Features
//!
//! - **Timeouts**: Bounded request time, reported as a transport error
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status Classification**: Non-2xx responses become `Error::HttpStatus`

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
