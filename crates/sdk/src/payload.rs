// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Payload construction for the three request kinds.
//!
//! Field names follow the collection endpoint's wire contract. Each builder
//! returns the serialized JSON body the queue stores verbatim; `user_id` is
//! attached only when a stored identifier already exists.

use serde_json::{json, Map, Value};

/// Build a track payload for a named event.
pub fn track(
    event_name: &str,
    event_properties: Map<String, Value>,
    user_properties: Map<String, Value>,
    user_id: Option<&str>,
    timestamp: i64,
) -> String {
    let mut body = json!({
        "event_name": event_name,
        "event_properties": event_properties,
        "user_properties": user_properties,
        "timestamp": timestamp,
    });
    attach_user_id(&mut body, user_id);
    body.to_string()
}

/// Build an identify payload binding the customer-provided user id.
pub fn identify(customer_user_id: &str, user_id: Option<&str>, timestamp: i64) -> String {
    let mut body = json!({
        "c_uid": customer_user_id,
        "join_timestamp": timestamp,
        "timestamp": timestamp,
    });
    attach_user_id(&mut body, user_id);
    body.to_string()
}

/// Build an add-user-properties payload.
pub fn add_properties(
    properties: Map<String, Value>,
    user_id: Option<&str>,
    timestamp: i64,
) -> String {
    let mut body = json!({
        "properties": properties,
        "timestamp": timestamp,
    });
    attach_user_id(&mut body, user_id);
    body.to_string()
}

fn attach_user_id(body: &mut Value, user_id: Option<&str>) {
    let Some(user_id) = user_id else { return };
    if let Value::Object(map) = body {
        map.insert("user_id".to_string(), Value::String(user_id.to_string()));
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
