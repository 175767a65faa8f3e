//! In-memory note/category stores with write-through persistence.
//!
//! # Responsibility
//! - Own the note and category collections for one session.
//! - Load each collection once from the gateway and write it back after
//!   every mutation.
//!
//! # Invariants
//! - Store operations never return gateway or codec errors; failures degrade
//!   to default state (reads) or dropped writes (writes) and are logged.
//! - Note ids are unique within the collection and never reused.
//! - Cascade delete updates both collections in memory before either write.

pub mod category_store;
pub mod clock;
pub mod codec;
pub mod note_store;

use crate::gateway::PersistenceGateway;
use crate::logging::{sanitize_message, MAX_LOGGED_VALUE_CHARS};
use log::warn;

/// Reads `key`, mapping gateway failures to `None`.
pub(crate) fn read_key<G: PersistenceGateway>(
    gateway: &G,
    module: &'static str,
    key: &str,
) -> Option<String> {
    match gateway.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=store_load module={module} status=degraded key={} error_code=gateway_read_failed error={err}",
                sanitize_message(key, MAX_LOGGED_VALUE_CHARS)
            );
            None
        }
    }
}

/// Writes `value` under `key`; returns whether the write reached the medium.
pub(crate) fn write_key<G: PersistenceGateway>(
    gateway: &G,
    module: &'static str,
    key: &str,
    value: &str,
) -> bool {
    match gateway.set(key, value) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event=store_persist module={module} status=dropped key={} bytes={} error_code=gateway_write_failed error={err}",
                sanitize_message(key, MAX_LOGGED_VALUE_CHARS),
                value.len()
            );
            false
        }
    }
}

/// Removes `key`; returns whether the removal reached the medium.
pub(crate) fn remove_key<G: PersistenceGateway>(
    gateway: &G,
    module: &'static str,
    key: &str,
) -> bool {
    match gateway.remove(key) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event=store_persist module={module} status=dropped key={} op=remove error_code=gateway_write_failed error={err}",
                sanitize_message(key, MAX_LOGGED_VALUE_CHARS)
            );
            false
        }
    }
}
