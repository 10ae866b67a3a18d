// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request types for the delivery queue.
//!
//! A [`QueuedRequest`] is one pending call awaiting delivery. Its payload is
//! opaque serialized JSON produced by the SDK facade; the queue stores and
//! forwards it verbatim. The [`RequestKind`] determines which collection
//! endpoint route the payload is posted to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The closed set of request kinds the SDK can produce.
///
/// Unknown kinds are prevented by construction; a row with an unparsable
/// kind is corrupt data, not a new kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Track a named event with properties.
    Track,
    /// Bind the anonymous user to a customer-provided user id.
    Identify,
    /// Attach additional properties to the user.
    AddProperties,
}

impl RequestKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Track => "track",
            RequestKind::Identify => "identify",
            RequestKind::AddProperties => "add_properties",
        }
    }

    /// Returns the collection endpoint route for this kind.
    pub fn route(&self) -> &'static str {
        match self {
            RequestKind::Track => "/sdk/event/track",
            RequestKind::Identify => "/sdk/user/identify",
            RequestKind::AddProperties => "/sdk/user/add_properties",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "track" => Ok(RequestKind::Track),
            "identify" => Ok(RequestKind::Identify),
            "add_properties" => Ok(RequestKind::AddProperties),
            _ => Err(Error::InvalidRequestKind(s.to_string())),
        }
    }
}

/// One pending request row from the durable queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRequest {
    /// Store-assigned id, strictly increasing in creation order.
    pub id: i64,
    /// Determines the target route.
    pub kind: RequestKind,
    /// Opaque serialized JSON body, stored verbatim.
    pub payload: String,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
