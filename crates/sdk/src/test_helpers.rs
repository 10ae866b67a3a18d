// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for pulse facade tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use pulse_core::{Delivery, Reachability};

use crate::device::DeviceInfo;
use crate::{Client, Config};

/// One recorded delivery attempt.
#[derive(Debug, Clone)]
pub struct Delivered {
    pub route: String,
    pub payload: String,
}

/// Mock delivery recording every attempt; responds with scripted bodies,
/// then `{}` once the script runs out.
pub struct MockDelivery {
    delivered: Mutex<Vec<Delivered>>,
    responses: Mutex<VecDeque<Option<Value>>>,
}

impl MockDelivery {
    pub fn new() -> Arc<Self> {
        Arc::new(MockDelivery {
            delivered: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        })
    }

    pub fn push_response(&self, response: Option<Value>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

/// Local wrapper so the foreign `Delivery` trait can be implemented for a
/// shared `Arc<MockDelivery>` handle without violating the orphan rule.
pub struct SharedMockDelivery(pub Arc<MockDelivery>);

impl Delivery for SharedMockDelivery {
    fn deliver(&self, route: &str, _token: &str, payload: &str) -> Option<Value> {
        self.0.delivered.lock().unwrap().push(Delivered {
            route: route.to_string(),
            payload: payload.to_string(),
        });
        match self.0.responses.lock().unwrap().pop_front() {
            Some(scripted) => scripted,
            None => Some(serde_json::json!({})),
        }
    }
}

/// Fixed reachability answer.
pub struct FixedReachability(pub bool);

impl Reachability for FixedReachability {
    fn is_reachable(&self) -> bool {
        self.0
    }
}

/// Device info with deterministic values for payload assertions.
pub struct TestDeviceInfo;

impl DeviceInfo for TestDeviceInfo {
    fn os_name(&self) -> String {
        "testos".to_string()
    }

    fn os_version(&self) -> String {
        "1.2.3".to_string()
    }

    fn brand(&self) -> String {
        "acme".to_string()
    }

    fn model(&self) -> String {
        "widget-9".to_string()
    }

    fn manufacturer(&self) -> String {
        "acme corp".to_string()
    }

    fn carrier(&self) -> String {
        String::new()
    }
}

/// Build an initialized client wired to a mock delivery.
pub fn make_client(reachable: bool) -> (Client, Arc<MockDelivery>) {
    let delivery = MockDelivery::new();
    let mut client = Client::new();
    client.initialize_inner(
        Config::new("https://collect.example.com", "project-token"),
        Box::new(TestDeviceInfo),
        Box::new(FixedReachability(reachable)),
        Box::new(SharedMockDelivery(Arc::clone(&delivery))),
    );
    (client, delivery)
}

/// Spin until `condition` holds, panicking after a generous timeout.
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
