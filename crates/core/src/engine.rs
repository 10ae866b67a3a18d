// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue engine: admission control and the delivery drain loop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  channel  ┌───────────┐          ┌───────────┐
//! │ submit() │──────────►│ admission │─ spawns ►│   drain   │
//! │ (caller) │           │  worker   │          │   loop    │
//! └──────────┘           └─────┬─────┘          └─────┬─────┘
//!                              │      ┌───────┐       │
//!                              └─────►│ Store │◄──────┘
//!                                     └───────┘
//! ```
//!
//! All submissions funnel through one worker thread, so enqueue order equals
//! call order and the capacity check is consistent under concurrent callers.
//! At most one drain loop runs at a time, guarded by an atomic flag; the loop
//! re-checks for work after clearing the flag so a request admitted during
//! its exit window is not stranded until the next submission.
//!
//! Delivery policy is at-most-once: each request gets exactly one attempt and
//! is removed whether or not a response came back. A transport failure loses
//! that request by design, trading potential data loss for bounded queue
//! growth and immunity to poison-message stalls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use serde_json::Value;

use crate::delivery::Delivery;
use crate::reachability::Reachability;
use crate::request::RequestKind;
use crate::store::{Store, USER_UUID_KEY};

/// Default admission cap on the number of queued requests.
pub const DEFAULT_MAX_QUEUE_SIZE: i64 = 1000;

/// Messages handled by the admission worker.
enum Command {
    /// Admit a request into the queue.
    Submit {
        kind: RequestKind,
        payload: String,
    },
    /// Stop the admission worker.
    Shutdown,
}

/// State shared between the caller, the admission worker, and drain threads.
struct Shared {
    /// Durable store, locked for each operation; never held across a
    /// delivery attempt.
    store: Mutex<Store>,
    /// Delivery client for the collection endpoint.
    delivery: Box<dyn Delivery>,
    /// Point-in-time connectivity check, re-queried each drain iteration.
    reachability: Box<dyn Reachability>,
    /// Project token sent as the Authorization header.
    token: String,
    /// Admission cap; submissions are dropped while the count is at it.
    max_queue_size: i64,
    /// True while a drain loop is active. Checked-and-set with `swap` so
    /// only one loop ever runs.
    draining: AtomicBool,
}

impl Shared {
    /// Lock the store, recovering from a poisoned lock rather than
    /// propagating a panic into the host application.
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Queue engine instance.
///
/// Constructed once at application startup and passed by reference to call
/// sites; its lifetime is managed by the embedding application. Dropping the
/// engine stops the admission worker; an in-flight drain pass finishes its
/// current attempt and exits on its own.
pub struct QueueEngine {
    shared: Arc<Shared>,
    tx: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl QueueEngine {
    /// Create an engine over an opened store and start the admission worker.
    /// A drain pass starts immediately, so requests persisted by a prior run
    /// are picked up without waiting for the next submission.
    pub fn new(
        store: Store,
        delivery: Box<dyn Delivery>,
        reachability: Box<dyn Reachability>,
        token: String,
        max_queue_size: i64,
    ) -> Self {
        let shared = Arc::new(Shared {
            store: Mutex::new(store),
            delivery,
            reachability,
            token,
            max_queue_size,
            draining: AtomicBool::new(false),
        });

        let (tx, rx) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || admission_loop(&worker_shared, &rx));

        // Pick up anything persisted by a prior run
        maybe_start_drain(&shared);

        QueueEngine {
            shared,
            tx,
            worker: Some(worker),
        }
    }

    /// Submit a request for queued delivery.
    ///
    /// Returns immediately; admission, persistence, and delivery all happen
    /// on background threads. Fire-and-forget: overflow and storage failures
    /// are logged and dropped, never surfaced to the caller.
    pub fn submit(&self, kind: RequestKind, payload: impl Into<String>) {
        let cmd = Command::Submit {
            kind,
            payload: payload.into(),
        };
        if self.tx.send(cmd).is_err() {
            tracing::warn!("submit after engine shutdown, dropping {} request", kind);
        }
    }

    /// Number of requests currently awaiting delivery.
    pub fn pending_count(&self) -> i64 {
        match self.shared.store().count() {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("queue count failed: {}", e);
                0
            }
        }
    }

    /// The server-assigned user identifier, if one has been received.
    pub fn user_id(&self) -> Option<String> {
        match self.shared.store().get_property(USER_UUID_KEY) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("user id read failed: {}", e);
                None
            }
        }
    }

    /// Clear the pending queue and all stored properties.
    pub fn reset(&self) {
        if let Err(e) = self.shared.store().reset() {
            tracing::warn!("store reset failed: {}", e);
        }
    }

    /// Stop the admission worker and wait for it to finish. Requests already
    /// queued remain durable and drain on the next engine start.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for QueueEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Admission worker: serializes all submissions and their store writes.
fn admission_loop(shared: &Arc<Shared>, rx: &Receiver<Command>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            Command::Submit { kind, payload } => {
                admit(shared, kind, &payload);
                maybe_start_drain(shared);
            }
            Command::Shutdown => break,
        }
    }
}

/// Capacity check and enqueue for one submission.
fn admit(shared: &Shared, kind: RequestKind, payload: &str) {
    let store = shared.store();

    let count = match store.count() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("queue count failed, dropping {} request: {}", kind, e);
            return;
        }
    };

    if count >= shared.max_queue_size {
        tracing::warn!(
            "queue at capacity ({}/{}), dropping {} request",
            count,
            shared.max_queue_size,
            kind
        );
        return;
    }

    match store.enqueue(kind, payload) {
        Ok(id) => tracing::debug!("queued {} request as id {}", kind, id),
        Err(e) => tracing::warn!("enqueue failed, dropping {} request: {}", kind, e),
    }
}

/// Start a drain thread unless one is already active.
fn maybe_start_drain(shared: &Arc<Shared>) {
    if shared.draining.swap(true, Ordering::SeqCst) {
        return;
    }
    let drain_shared = Arc::clone(shared);
    thread::spawn(move || drain(&drain_shared));
}

/// Run drain passes until the queue is empty or the network is unreachable,
/// closing the race with requests admitted while the pass was winding down.
///
/// Invariant: entered with the `draining` flag held, exits with it clear.
fn drain(shared: &Shared) {
    loop {
        drain_pass(shared);
        shared.draining.store(false, Ordering::SeqCst);

        // A request admitted after the pass saw an empty queue would wait
        // until the next submission; re-check and take the flag back if
        // there is still work to do.
        let more = shared.reachability.is_reachable()
            && match shared.store().count() {
                Ok(count) => count > 0,
                Err(e) => {
                    tracing::warn!("queue count failed during drain exit: {}", e);
                    false
                }
            };
        if more && !shared.draining.swap(true, Ordering::SeqCst) {
            continue;
        }
        break;
    }
}

/// One drain pass: peek, deliver, remove, apply identity; repeat.
fn drain_pass(shared: &Shared) {
    loop {
        if !shared.reachability.is_reachable() {
            tracing::debug!("network unreachable, stopping drain pass");
            return;
        }

        let req = match shared.store().peek_oldest() {
            Ok(Some(req)) => req,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("peek failed, stopping drain pass: {}", e);
                return;
            }
        };

        // Store lock is released while the request is on the wire.
        let resp = shared
            .delivery
            .deliver(req.kind.route(), &shared.token, &req.payload);

        // At-most-once: removed whether or not the attempt produced a
        // response.
        if let Err(e) = shared.store().remove(req.id) {
            tracing::warn!("remove of request {} failed: {}", req.id, e);
        }

        if let Some(resp) = resp {
            apply_identity(shared, &resp);
        }
    }
}

/// Persist a server-assigned user identifier carried in a response.
/// Subsequent payloads are tagged with it; queued payloads are not rewritten.
fn apply_identity(shared: &Shared, resp: &Value) {
    let Some(user_id) = resp.get("user_id").and_then(Value::as_str) else {
        return;
    };
    if user_id.is_empty() {
        return;
    }
    if let Err(e) = shared.store().set_property(USER_UUID_KEY, user_id) {
        tracing::warn!("failed to persist user id: {}", e);
    } else {
        tracing::debug!("user id updated from server response");
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
