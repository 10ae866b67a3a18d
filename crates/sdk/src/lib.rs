// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! pulse: Embedded telemetry SDK facade.
//!
//! The [`Client`] is the embedding application's entry point. It is an
//! explicit instance with host-managed lifetime: construct it once at
//! startup, initialize it with a [`Config`], and pass it by reference to
//! call sites. Every public call returns immediately; queuing and delivery
//! happen on background threads inside the `pulse-core` queue engine, and
//! no error or panic ever crosses into the host.
//!
//! ```no_run
//! use pulse::{Client, Config};
//!
//! let mut client = Client::new();
//! client.initialize(Config::new("https://collect.example.com", "project-token"));
//!
//! let mut props = serde_json::Map::new();
//! props.insert("plan".into(), "pro".into());
//! client.track("signup_completed", props);
//! ```

pub mod config;
pub mod device;
pub mod payload;

use chrono::Utc;
use serde_json::{Map, Value};

use pulse_core::{Delivery, HttpDelivery, QueueEngine, RequestKind, Store};

pub use config::Config;
pub use device::{DeviceInfo, HostDeviceInfo};
pub use pulse_core::{AssumeOnline, Reachability};

/// Initialized SDK state.
struct Inner {
    engine: QueueEngine,
    device: Box<dyn DeviceInfo>,
}

/// Telemetry SDK client.
///
/// All calls are no-ops until [`Client::initialize`] succeeds, and all
/// tracking calls are fire-and-forget.
pub struct Client {
    inner: Option<Inner>,
}

impl Client {
    /// Create an uninitialized client. Every public call is a no-op until
    /// [`Client::initialize`] is called.
    pub fn new() -> Self {
        Client { inner: None }
    }

    /// Initialize with the default device info and reachability providers.
    pub fn initialize(&mut self, config: Config) {
        self.initialize_with(
            config,
            Box::new(HostDeviceInfo),
            Box::new(pulse_core::AssumeOnline),
        );
    }

    /// Initialize with host-supplied device info and reachability providers.
    ///
    /// Called at application startup. A missing token or a storage failure
    /// leaves the client uninitialized with a warning; it never panics.
    /// Repeated initialization is ignored.
    pub fn initialize_with(
        &mut self,
        config: Config,
        device: Box<dyn DeviceInfo>,
        reachability: Box<dyn Reachability>,
    ) {
        let delivery = match HttpDelivery::new(&config.server_url, config.http_timeout) {
            Ok(delivery) => Box::new(delivery),
            Err(e) => {
                tracing::warn!("http client setup failed, SDK disabled: {}", e);
                return;
            }
        };
        self.initialize_inner(config, device, reachability, delivery);
    }

    /// Shared initialization path; tests inject a mock delivery here.
    fn initialize_inner(
        &mut self,
        config: Config,
        device: Box<dyn DeviceInfo>,
        reachability: Box<dyn Reachability>,
        delivery: Box<dyn Delivery>,
    ) {
        if self.inner.is_some() {
            tracing::warn!("client already initialized, ignoring");
            return;
        }
        if config.token.is_empty() {
            tracing::warn!("missing project token, SDK disabled");
            return;
        }
        if config.debug_logging {
            setup_logging();
        }

        let store = match &config.db_path {
            Some(path) => Store::open(path),
            None => Store::open_in_memory(),
        };
        let store = match store {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("store setup failed, SDK disabled: {}", e);
                return;
            }
        };

        let engine = QueueEngine::new(
            store,
            delivery,
            reachability,
            config.token,
            config.max_queue_size,
        );
        self.inner = Some(Inner { engine, device });
        tracing::info!("pulse client initialized");
    }

    /// Whether the client has been successfully initialized.
    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    /// Track a named event with caller-supplied properties.
    ///
    /// No-op on an empty event name. Device metadata is attached as user
    /// properties; the caller's event properties are passed through.
    pub fn track(&self, event_name: &str, properties: Map<String, Value>) {
        let Some(inner) = &self.inner else {
            tracing::debug!("track before initialize, ignoring");
            return;
        };
        if event_name.trim().is_empty() {
            tracing::debug!("track with empty event name, ignoring");
            return;
        }

        let user_properties = device::device_properties(inner.device.as_ref());
        let body = payload::track(
            event_name,
            properties,
            user_properties,
            inner.engine.user_id().as_deref(),
            Utc::now().timestamp(),
        );
        inner.engine.submit(RequestKind::Track, body);
    }

    /// Bind the current user to a customer-provided user id.
    ///
    /// No-op on an empty id.
    pub fn identify(&self, customer_user_id: &str) {
        let Some(inner) = &self.inner else {
            tracing::debug!("identify before initialize, ignoring");
            return;
        };
        if customer_user_id.trim().is_empty() {
            tracing::debug!("identify with empty user id, ignoring");
            return;
        }

        let body = payload::identify(
            customer_user_id,
            inner.engine.user_id().as_deref(),
            Utc::now().timestamp(),
        );
        inner.engine.submit(RequestKind::Identify, body);
    }

    /// Attach additional properties to the current user.
    ///
    /// No-op on an empty property map.
    pub fn add_user_properties(&self, properties: Map<String, Value>) {
        let Some(inner) = &self.inner else {
            tracing::debug!("add_user_properties before initialize, ignoring");
            return;
        };
        if properties.is_empty() {
            tracing::debug!("add_user_properties with no properties, ignoring");
            return;
        }

        let body = payload::add_properties(
            properties,
            inner.engine.user_id().as_deref(),
            Utc::now().timestamp(),
        );
        inner.engine.submit(RequestKind::AddProperties, body);
    }

    /// Clear the stored identity and all pending requests.
    pub fn reset(&self) {
        let Some(inner) = &self.inner else { return };
        inner.engine.reset();
    }

    /// The server-assigned user identifier, if one has been received.
    pub fn user_id(&self) -> Option<String> {
        self.inner.as_ref().and_then(|inner| inner.engine.user_id())
    }

    /// Number of requests currently awaiting delivery.
    pub fn pending_count(&self) -> i64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.engine.pending_count())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a fmt subscriber for SDK diagnostics, unless the host already
/// installed one.
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulse=debug,pulse_core=debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
