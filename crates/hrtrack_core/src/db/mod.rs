//! SQLite storage bootstrap, schema migrations and the per-call store handle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the persistence layer.
//! - Apply schema migrations in deterministic order.
//! - Hand out one fresh connection per repository call through [`Store`].
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No repository reads or writes entity rows before migrations succeed.
//! - A [`Store`] never caches a connection between calls.

use thiserror::Error;

pub mod migrations;
mod open;
mod store;

pub use open::{open_db, open_db_in_memory};
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening or bootstrapping the store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
