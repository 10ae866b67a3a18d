// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability check.
//!
//! A point-in-time, advisory query of the host platform's connectivity
//! state. The drain loop consults it fresh on every iteration; a positive
//! answer does not guarantee the subsequent delivery attempt will succeed.

/// Point-in-time connectivity query.
///
/// Implementations must be cheap and non-blocking. Embedding applications
/// inject their platform's connectivity signal here; tests inject mocks.
pub trait Reachability: Send + Sync {
    /// Whether the device currently appears to have network connectivity.
    fn is_reachable(&self) -> bool;
}

/// Default reachability for hosts without a platform connectivity signal:
/// always reports online and lets delivery attempts fail on their own.
pub struct AssumeOnline;

impl Reachability for AssumeOnline {
    fn is_reachable(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "reachability_tests.rs"]
mod tests;
