// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration for the SDK client.

use std::path::PathBuf;
use std::time::Duration;

use pulse_core::DEFAULT_MAX_QUEUE_SIZE;

/// Configuration for the SDK client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the collection endpoint.
    pub server_url: String,
    /// Project token, sent as the Authorization header. Required.
    pub token: String,
    /// Admission cap on the number of queued requests.
    pub max_queue_size: i64,
    /// Path for the durable store. `None` uses an in-memory store, which
    /// does not survive restarts.
    pub db_path: Option<PathBuf>,
    /// Timeout applied to each delivery attempt.
    pub http_timeout: Duration,
    /// Install a fmt tracing subscriber for SDK diagnostics. Leave off when
    /// the host application manages its own subscriber.
    pub debug_logging: bool,
}

impl Config {
    /// Create a configuration with the given endpoint and project token.
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Config {
            server_url: server_url.into(),
            token: token.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: "https://api.pulse.example.com".to_string(),
            token: String::new(),
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            db_path: None,
            http_timeout: Duration::from_secs(10),
            debug_logging: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
