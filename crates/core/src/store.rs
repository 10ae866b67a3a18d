// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for queued requests and persisted properties.
//!
//! The [`Store`] struct provides the two durable tables the SDK relies on:
//! a key/value `properties` table (holds the server-assigned user identifier)
//! and an auto-incrementing `requests` FIFO table of pending deliveries.
//! Both survive process restarts.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::request::{QueuedRequest, RequestKind};

/// Property key under which the server-assigned user identifier is stored.
pub const USER_UUID_KEY: &str = "USER_UUID";

/// SQL schema for the SDK database.
pub const SCHEMA: &str = r#"
-- Durable key/value properties, one row per key
CREATE TABLE IF NOT EXISTS properties (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- FIFO request queue; id order is delivery order
CREATE TABLE IF NOT EXISTS requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL
);
"#;

/// Parse a request kind from the database, returning a rusqlite error on
/// parse failure so it surfaces through the normal query path.
fn parse_kind(value: &str) -> std::result::Result<RequestKind, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid request kind '{value}' in column 'kind'"
            ))),
        )
    })
}

/// SQLite database connection with queue and property operations.
///
/// The store itself is safe for use behind a lock from multiple contexts;
/// engine-level drain exclusion is layered on top of it, not inside it.
pub struct Store {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Store {
    /// Open a store at the given path, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL mode for concurrent access from admission and delivery contexts
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// Open an in-memory store (for testing and hosts without a data dir).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// Upsert a property. Overwrites any existing value for `key`.
    pub fn set_property(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO properties (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read a property, or `None` if it was never set.
    pub fn get_property(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM properties WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Append a request to the end of the FIFO and return its assigned id.
    pub fn enqueue(&self, kind: RequestKind, payload: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO requests (kind, payload) VALUES (?1, ?2)",
            params![kind.as_str(), payload],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Return the lowest-id request without removing it, or `None` if the
    /// queue is empty.
    pub fn peek_oldest(&self) -> Result<Option<QueuedRequest>> {
        let req = self
            .conn
            .query_row(
                "SELECT id, kind, payload FROM requests ORDER BY id LIMIT 1",
                [],
                |row| {
                    let kind_str: String = row.get(1)?;
                    Ok(QueuedRequest {
                        id: row.get(0)?,
                        kind: parse_kind(&kind_str)?,
                        payload: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(req)
    }

    /// Delete the request with the given id. A no-op if the id is absent,
    /// so a double-delete from a delivery race is harmless.
    pub fn remove(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM requests WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Number of currently queued requests.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Full reset: clears the pending queue and all stored properties,
    /// including the user identifier.
    pub fn reset(&self) -> Result<()> {
        self.conn.execute("DELETE FROM requests", [])?;
        self.conn.execute("DELETE FROM properties", [])?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
