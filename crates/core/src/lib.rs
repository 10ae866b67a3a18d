// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pulse-core: Persistent request queue and delivery engine for the Pulse SDK.
//!
//! This crate provides the durable store, reachability seam, delivery client,
//! and queue engine used by the `pulse` facade crate. Callers submit
//! serialized requests; the engine stores them durably and drains them to the
//! collection endpoint with at-most-one-uploader concurrency, connectivity
//! gating, and a queue-size admission limit.

pub mod delivery;
pub mod engine;
pub mod error;
pub mod reachability;
pub mod request;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use delivery::{Delivery, HttpDelivery};
pub use engine::{QueueEngine, DEFAULT_MAX_QUEUE_SIZE};
pub use error::{Error, Result};
pub use reachability::{AssumeOnline, Reachability};
pub use request::{QueuedRequest, RequestKind};
pub use store::{Store, USER_UUID_KEY};
