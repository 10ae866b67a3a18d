// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery client for the collection endpoint.
//!
//! Provides a trait-based delivery layer that enables:
//! - Real HTTP POSTs for production
//! - Mock deliveries for unit testing
//!
//! One invocation performs exactly one outbound call and blocks the calling
//! thread until it completes or fails. Retry is entirely the queue engine's
//! responsibility (and per its at-most-once policy, it never retries either).

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::Result;

/// Delivery trait for submitting one serialized request to the server.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Delivery: Send + Sync {
    /// Submit `payload` to `route`, authorized by `token`.
    ///
    /// Returns the parsed JSON response body, or `None` on any transport
    /// failure (connection error, I/O error, malformed response body).
    /// Failures are logged, never raised.
    fn deliver(&self, route: &str, token: &str, payload: &str) -> Option<Value>;
}

/// HTTP delivery implementation using a blocking reqwest client.
pub struct HttpDelivery {
    /// Server base URL, without trailing slash.
    base_url: String,
    /// Reusable HTTP client with a request timeout.
    client: Client,
}

impl HttpDelivery {
    /// Create a new HTTP delivery client for the given server base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpDelivery {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The server base URL this client posts to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Delivery for HttpDelivery {
    fn deliver(&self, route: &str, token: &str, payload: &str) -> Option<Value> {
        let url = format!("{}{}", self.base_url, route);

        let response = match self
            .client
            .post(&url)
            .header("Authorization", token)
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("delivery to {} failed: {}", route, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            // The body may still carry a structured error; parse it anyway.
            tracing::warn!("delivery to {} returned status {}", route, status);
        }

        match response.json::<Value>() {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("malformed response body from {}: {}", route, e);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
