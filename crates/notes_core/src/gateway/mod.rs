//! Persistence gateway contract and implementations.
//!
//! # Responsibility
//! - Define the narrow synchronous key-value interface used by stores.
//! - Provide in-memory, unavailable and SQLite-backed implementations.
//!
//! # Invariants
//! - Gateways report failures as `GatewayError`; stores decide how to degrade.
//! - Keys and values are opaque UTF-8 strings.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

mod memory;
mod sqlite;

pub use memory::{MemoryGateway, UnavailableGateway};
pub use sqlite::SqliteGateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure reported by a persistence medium.
#[derive(Debug)]
pub enum GatewayError {
    /// The medium is absent or refuses access.
    Unavailable(&'static str),
    /// SQLite-backed medium failed.
    Db(DbError),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous key-value store consumed by note/category/auth stores.
pub trait PersistenceGateway {
    /// Reads the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> GatewayResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> GatewayResult<()>;
    /// Removes `key`; removing an absent key succeeds.
    fn remove(&self, key: &str) -> GatewayResult<()>;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for &G {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> GatewayResult<()> {
        (**self).remove(key)
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Rc<G> {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> GatewayResult<()> {
        (**self).remove(key)
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> GatewayResult<()> {
        (**self).remove(key)
    }
}
