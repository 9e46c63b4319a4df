//! Per-call connection source shared by every repository.

use super::{open_db, DbResult};
use crate::config::StoreConfig;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Location of the relational store.
///
/// Cloning is cheap; the handle owns no connection. Each call to
/// [`Store::connect`] opens, configures and migrates a fresh one, which is
/// closed when the caller drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.database_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens one connection for exactly one repository operation.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db(&self.path)
    }
}
