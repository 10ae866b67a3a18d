// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for pulse-core tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::delivery::Delivery;
use crate::reachability::Reachability;

/// One recorded delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub route: String,
    pub token: String,
    pub payload: String,
}

/// Mock delivery that records every attempt and replays scripted responses.
///
/// Responses are popped in order; once the script is exhausted, every
/// further attempt gets `default_response`.
pub struct MockDelivery {
    delivered: Mutex<Vec<Delivered>>,
    responses: Mutex<VecDeque<Option<Value>>>,
    default_response: Option<Value>,
    /// Artificial per-attempt latency, for overlap tests.
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockDelivery {
    pub fn new() -> Arc<Self> {
        Self::with_default_response(Some(serde_json::json!({})))
    }

    pub fn with_default_response(default_response: Option<Value>) -> Arc<Self> {
        Arc::new(MockDelivery {
            delivered: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            default_response,
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(MockDelivery {
            delivered: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            default_response: Some(serde_json::json!({})),
            latency,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// Queue one scripted response ahead of the default.
    pub fn push_response(&self, response: Option<Value>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// All attempts recorded so far, in order.
    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    /// Highest number of concurrently in-flight attempts observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Delivery for MockDelivery {
    fn deliver(&self, route: &str, token: &str, payload: &str) -> Option<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        self.delivered.lock().unwrap().push(Delivered {
            route: route.to_string(),
            token: token.to_string(),
            payload: payload.to_string(),
        });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.lock().unwrap().pop_front() {
            Some(scripted) => scripted,
            None => self.default_response.clone(),
        }
    }
}

/// Delivery impl for an `Arc<MockDelivery>` so one handle can be shared
/// between the engine and test assertions.
impl Delivery for Arc<MockDelivery> {
    fn deliver(&self, route: &str, token: &str, payload: &str) -> Option<Value> {
        self.as_ref().deliver(route, token, payload)
    }
}

/// Mock reachability backed by a shared flag tests can flip.
pub struct MockReachability {
    reachable: Arc<AtomicBool>,
}

impl MockReachability {
    pub fn new(reachable: bool) -> (Self, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(reachable));
        (
            MockReachability {
                reachable: Arc::clone(&flag),
            },
            flag,
        )
    }
}

impl Reachability for MockReachability {
    fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }
}

/// Spin until `condition` holds, panicking after a generous timeout so a
/// wedged background thread fails the test instead of hanging it.
pub fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            std::time::Instant::now() < deadline,
            "timed out waiting for: {what}"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}
