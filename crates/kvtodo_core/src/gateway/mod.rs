//! Key-value persistence gateway.
//!
//! # Responsibility
//! - Define the two-operation contract the controller persists through.
//! - Provide concrete stores: SQLite-backed and in-memory.
//!
//! # Invariants
//! - Values are opaque text; the gateway never inspects them.
//! - A failed call leaves the caller running; errors are values, not panics.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

/// Key under which the whole task list is stored.
pub const STORAGE_KEY: &str = "todos";

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure of a gateway read or write.
#[derive(Debug)]
pub enum GatewayError {
    /// Backing database failed.
    Db(DbError),
    /// Store could not be reached or refused the call.
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
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

/// Key-value store consumed by the todo controller.
///
/// Calls are blocking and issued one at a time.
pub trait KvGateway {
    /// Reads the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> GatewayResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> GatewayResult<()>;
}

impl<G: KvGateway + ?Sized> KvGateway for &G {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        (**self).set(key, value)
    }
}
