// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device metadata collaborator.
//!
//! The SDK treats every field as an opaque string and never validates it;
//! the values are merged into user properties under `$`-prefixed keys.
//! Embedding applications supply their platform's implementation;
//! [`HostDeviceInfo`] is a minimal default for hosts without one.

use serde_json::{Map, Value};

/// Platform tag attached to every payload's user properties.
const PLATFORM: &str = "app";

/// Device and platform metadata provider.
pub trait DeviceInfo: Send + Sync {
    /// Operating system name, e.g. "android".
    fn os_name(&self) -> String;
    /// Operating system version string.
    fn os_version(&self) -> String;
    /// Device brand.
    fn brand(&self) -> String;
    /// Device model.
    fn model(&self) -> String;
    /// Device manufacturer.
    fn manufacturer(&self) -> String;
    /// Mobile carrier name, if any.
    fn carrier(&self) -> String;
}

/// Default device info backed by compile-time host facts. Fields with no
/// host equivalent are empty and omitted from payloads.
pub struct HostDeviceInfo;

impl DeviceInfo for HostDeviceInfo {
    fn os_name(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn os_version(&self) -> String {
        String::new()
    }

    fn brand(&self) -> String {
        String::new()
    }

    fn model(&self) -> String {
        std::env::consts::ARCH.to_string()
    }

    fn manufacturer(&self) -> String {
        String::new()
    }

    fn carrier(&self) -> String {
        String::new()
    }
}

/// Collect device metadata as `$`-prefixed user properties, skipping
/// empty values.
pub fn device_properties(info: &dyn DeviceInfo) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("$platform".to_string(), Value::String(PLATFORM.to_string()));

    let fields = [
        ("$os", info.os_name()),
        ("$os_version", info.os_version()),
        ("$brand", info.brand()),
        ("$model", info.model()),
        ("$manufacturer", info.manufacturer()),
        ("$carrier", info.carrier()),
    ];
    for (key, value) in fields {
        if !value.is_empty() {
            props.insert(key.to_string(), Value::String(value));
        }
    }

    props
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
