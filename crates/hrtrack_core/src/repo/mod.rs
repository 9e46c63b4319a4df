//! Repository contract shared by every entity kind, plus one SQLite
//! implementation per entity.
//!
//! # Responsibility
//! - Define the uniform CRUD contract (`Repository`).
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation opens its own connection and releases it before
//!   returning, on success and on failure.
//! - A missing row is `Ok(None)` / `Ok(false)`, never an error.
//! - Store and mapping failures are returned as `Err` and logged where they
//!   happen. Callers that prefer an empty/zero result use [`FailOpen`].
//! - All values are bound as SQL parameters.

use crate::db::{DbError, Store};
use crate::logging::sanitize_for_log;
use crate::model::{Entity, EntityId};
use log::warn;
use thiserror::Error;

pub mod application_repo;
pub mod application_status_repo;
pub mod base;
pub mod campaign_job_posting_repo;
pub mod candidate_repo;
pub mod department_repo;
pub mod email_log_repo;
pub mod employee_repo;
pub mod headcount_repo;
pub mod interview_repo;
pub mod job_posting_repo;
pub mod position_repo;
pub mod recruitment_campaign_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    /// Connection, bootstrap or statement failure.
    #[error(transparent)]
    Db(#[from] DbError),
    /// A row does not have the shape the mapper expects.
    #[error("cannot map column `{column}`: {reason}")]
    Mapping { column: String, reason: String },
    /// A uniqueness rule checked by the repository before inserting.
    #[error("{entity} already exists for {key}")]
    Duplicate { entity: &'static str, key: String },
    /// Audit rows cannot be removed.
    #[error("{entity} is append-only; refusing to {operation} id {id}")]
    AppendOnly {
        entity: &'static str,
        operation: &'static str,
        id: EntityId,
    },
}

impl RepoError {
    pub(crate) fn mapping(column: &str, reason: impl Into<String>) -> Self {
        Self::Mapping {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Uniform CRUD contract over one entity kind.
///
/// `get_by_id`, `get_all`, `add` and `update` depend on each entity's shape
/// and joins. The remaining operations have shared defaults keyed by
/// `Entity::TABLE`; a repository overrides them only when the entity needs
/// different semantics.
pub trait Repository {
    type Entity: Entity;

    /// Store this repository opens its per-call connections against.
    fn store(&self) -> &Store;

    /// Loads one row, enriched with navigation data where the entity has any.
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Self::Entity>>;

    /// Loads every row in the entity's default order.
    fn get_all(&self) -> RepoResult<Vec<Self::Entity>>;

    /// Inserts the entity, stamping `created_date`, and returns the new id.
    ///
    /// `entity.id` is ignored. Required fields are the caller's concern.
    fn add(&self, entity: &Self::Entity) -> RepoResult<EntityId>;

    /// Writes the entity's updatable columns and stamps `updated_date`.
    ///
    /// Returns whether a row was affected.
    fn update(&self, entity: &Self::Entity) -> RepoResult<bool>;

    /// Hard delete by primary key. Returns whether a row was removed.
    fn delete(&self, id: EntityId) -> RepoResult<bool> {
        base::delete_by_id(self.store(), Self::Entity::TABLE, id)
    }

    /// Loads the whole table through `get_all` and filters in memory.
    ///
    /// O(table size) per call; use a dedicated finder on hot paths.
    fn find<P>(&self, predicate: P) -> RepoResult<Vec<Self::Entity>>
    where
        P: FnMut(&Self::Entity) -> bool,
    {
        Ok(base::filter_rows(self.get_all()?, predicate))
    }

    fn count(&self) -> RepoResult<i64> {
        base::count_rows(self.store(), Self::Entity::TABLE)
    }

    fn exists(&self, id: EntityId) -> RepoResult<bool> {
        base::row_exists(self.store(), Self::Entity::TABLE, id)
    }
}

/// Degrades a failed repository call into its "no result" sentinel.
///
/// The failure has already been logged by the repository; this records that
/// the caller chose to continue with an empty value.
pub trait FailOpen<T> {
    fn or_sentinel(self) -> T;
}

impl<T: Default> FailOpen<T> for RepoResult<T> {
    fn or_sentinel(self) -> T {
        self.unwrap_or_else(|err| {
            warn!(
                "event=repo_fail_open module=repo status=degraded error={}",
                sanitize_for_log(&err.to_string())
            );
            T::default()
        })
    }
}
