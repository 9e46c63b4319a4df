//! Append-only audit trail of application status transitions.
//!
//! # Invariants
//! - Rows are never deleted. `delete` is rejected with
//!   `RepoError::AppendOnly` without touching the store.
//! - After insertion only `Comments` may change.
//! - History reads are ordered by `ChangedDate`, ties broken by insertion
//!   order (`ApplicationStatusID`).
//! - This repository never writes `Application.CurrentStatus`.

use super::base::{
    self, fmt_datetime, now, opt_datetime, opt_i64, opt_string, req_datetime, req_i64, req_string,
};
use super::{RepoError, RepoResult, Repository};
use crate::db::Store;
use crate::model::application::{
    ApplicationStatus, ApplicationStatusNavigation, StatusCount, StatusStatistics,
};
use crate::model::{Entity, EntityId};
use chrono::NaiveDateTime;
use log::warn;
use rusqlite::{params, Connection, Row};

const STATUS_COLUMNS: &str = "
    s.ApplicationStatusID AS ApplicationStatusID,
    s.ApplicationID AS ApplicationID,
    s.OldStatus AS OldStatus,
    s.NewStatus AS NewStatus,
    s.ChangedBy AS ChangedBy,
    s.ChangedDate AS ChangedDate,
    s.Comments AS Comments,
    s.CreatedDate AS CreatedDate,
    s.UpdatedDate AS UpdatedDate";

const HISTORY_ORDER: &str = "ORDER BY s.ChangedDate ASC, s.ApplicationStatusID ASC";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {STATUS_COLUMNS},
                u.Username AS ChangedByUsername
             FROM ApplicationStatus s
             LEFT JOIN User u ON u.UserID = s.ChangedBy"
        )
    } else {
        format!("SELECT {STATUS_COLUMNS} FROM ApplicationStatus s")
    }
}

pub trait ApplicationStatusRepository: Repository<Entity = ApplicationStatus> {
    /// Appends one transition stamped with the current time and returns its id.
    fn record_transition(
        &self,
        application_id: EntityId,
        old_status: Option<&str>,
        new_status: &str,
        changed_by: Option<EntityId>,
        comments: Option<&str>,
    ) -> RepoResult<EntityId>;
    /// Full history of one application, oldest first.
    fn get_by_application_id(&self, application_id: EntityId)
        -> RepoResult<Vec<ApplicationStatus>>;
    /// Most recent transition of one application, if any.
    fn get_latest_status(&self, application_id: EntityId) -> RepoResult<Option<ApplicationStatus>>;
    /// Transitions with `changed_date` in `[from, to]`, oldest first.
    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<ApplicationStatus>>;
    /// Transitions made by one user, newest first.
    fn get_by_changed_by(&self, user_id: EntityId) -> RepoResult<Vec<ApplicationStatus>>;
    fn count_by_application(&self, application_id: EntityId) -> RepoResult<i64>;
    /// Number of transitions into each status, most frequent first.
    fn count_by_new_status(&self) -> RepoResult<Vec<StatusCount>>;
    fn get_status_statistics(&self) -> RepoResult<Vec<StatusStatistics>>;
}

pub struct SqliteApplicationStatusRepository {
    store: Store,
}

impl SqliteApplicationStatusRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn insert_status(conn: &Connection, status: &ApplicationStatus) -> RepoResult<EntityId> {
    base::insert(
        conn,
        "INSERT INTO ApplicationStatus (
            ApplicationID,
            OldStatus,
            NewStatus,
            ChangedBy,
            ChangedDate,
            Comments,
            CreatedDate
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            status.application_id,
            status.old_status.as_deref(),
            status.new_status.as_str(),
            status.changed_by,
            fmt_datetime(status.changed_date),
            status.comments.as_deref(),
            fmt_datetime(now()),
        ],
    )
}

impl Repository for SqliteApplicationStatusRepository {
    type Entity = ApplicationStatus;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<ApplicationStatus>> {
        base::run(&self.store, ApplicationStatus::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE s.ApplicationStatusID = ?1;", select_sql(true)),
                [id],
                |row| map_status(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<ApplicationStatus>> {
        base::run(&self.store, ApplicationStatus::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY s.ChangedDate DESC, s.ApplicationStatusID DESC;",
                    select_sql(true)
                ),
                [],
                |row| map_status(row, true),
            )
        })
    }

    fn add(&self, status: &ApplicationStatus) -> RepoResult<EntityId> {
        base::run(&self.store, ApplicationStatus::TABLE, "add", |conn| {
            insert_status(conn, status)
        })
    }

    /// Rewrites `Comments` only; the transition itself is immutable.
    fn update(&self, status: &ApplicationStatus) -> RepoResult<bool> {
        base::run(&self.store, ApplicationStatus::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE ApplicationStatus
                 SET Comments = ?2, UpdatedDate = ?3
                 WHERE ApplicationStatusID = ?1;",
                params![status.id, status.comments.as_deref(), fmt_datetime(now())],
            )
        })
    }

    fn delete(&self, id: EntityId) -> RepoResult<bool> {
        warn!(
            "event=repo_call module=repo status=rejected entity={} op=delete id={}",
            ApplicationStatus::TABLE.name,
            id
        );
        Err(RepoError::AppendOnly {
            entity: ApplicationStatus::TABLE.name,
            operation: "delete",
            id,
        })
    }
}

impl ApplicationStatusRepository for SqliteApplicationStatusRepository {
    fn record_transition(
        &self,
        application_id: EntityId,
        old_status: Option<&str>,
        new_status: &str,
        changed_by: Option<EntityId>,
        comments: Option<&str>,
    ) -> RepoResult<EntityId> {
        let mut entry = ApplicationStatus::new(
            application_id,
            old_status.map(str::to_string),
            new_status.trim(),
            now(),
        );
        entry.changed_by = changed_by;
        entry.comments = comments.map(str::to_string);

        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "record_transition",
            |conn| insert_status(conn, &entry),
        )
    }

    fn get_by_application_id(
        &self,
        application_id: EntityId,
    ) -> RepoResult<Vec<ApplicationStatus>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "get_by_application_id",
            |conn| {
                base::query_all(
                    conn,
                    &format!("{} WHERE s.ApplicationID = ?1 {HISTORY_ORDER};", select_sql(true)),
                    [application_id],
                    |row| map_status(row, true),
                )
            },
        )
    }

    fn get_latest_status(&self, application_id: EntityId) -> RepoResult<Option<ApplicationStatus>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "get_latest_status",
            |conn| {
                base::query_first(
                    conn,
                    &format!(
                        "{} WHERE s.ApplicationID = ?1
                         ORDER BY s.ChangedDate DESC, s.ApplicationStatusID DESC
                         LIMIT 1;",
                        select_sql(true)
                    ),
                    [application_id],
                    |row| map_status(row, true),
                )
            },
        )
    }

    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<ApplicationStatus>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "get_by_date_range",
            |conn| {
                base::query_all(
                    conn,
                    &format!(
                        "{} WHERE s.ChangedDate >= ?1 AND s.ChangedDate <= ?2 {HISTORY_ORDER};",
                        select_sql(false)
                    ),
                    params![fmt_datetime(from), fmt_datetime(to)],
                    |row| map_status(row, false),
                )
            },
        )
    }

    fn get_by_changed_by(&self, user_id: EntityId) -> RepoResult<Vec<ApplicationStatus>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "get_by_changed_by",
            |conn| {
                base::query_all(
                    conn,
                    &format!(
                        "{} WHERE s.ChangedBy = ?1
                         ORDER BY s.ChangedDate DESC, s.ApplicationStatusID DESC;",
                        select_sql(true)
                    ),
                    [user_id],
                    |row| map_status(row, true),
                )
            },
        )
    }

    fn count_by_application(&self, application_id: EntityId) -> RepoResult<i64> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "count_by_application",
            |conn| {
                base::query_scalar(
                    conn,
                    "SELECT COUNT(*) FROM ApplicationStatus WHERE ApplicationID = ?1;",
                    [application_id],
                )
            },
        )
    }

    fn count_by_new_status(&self) -> RepoResult<Vec<StatusCount>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "count_by_new_status",
            |conn| {
                base::query_all(
                    conn,
                    "SELECT NewStatus, COUNT(*) AS Transitions
                     FROM ApplicationStatus
                     GROUP BY NewStatus
                     ORDER BY Transitions DESC, NewStatus ASC;",
                    [],
                    |row| {
                        Ok(StatusCount {
                            status: req_string(row, "NewStatus")?,
                            count: req_i64(row, "Transitions")?,
                        })
                    },
                )
            },
        )
    }

    fn get_status_statistics(&self) -> RepoResult<Vec<StatusStatistics>> {
        base::run(
            &self.store,
            ApplicationStatus::TABLE,
            "get_status_statistics",
            |conn| {
                base::query_all(
                    conn,
                    "SELECT
                        NewStatus,
                        COUNT(*) AS Transitions,
                        COUNT(DISTINCT ApplicationID) AS Applications,
                        MIN(ChangedDate) AS FirstChanged,
                        MAX(ChangedDate) AS LastChanged
                     FROM ApplicationStatus
                     GROUP BY NewStatus
                     ORDER BY Transitions DESC, NewStatus ASC;",
                    [],
                    |row| {
                        Ok(StatusStatistics {
                            status: req_string(row, "NewStatus")?,
                            transitions: req_i64(row, "Transitions")?,
                            applications: req_i64(row, "Applications")?,
                            first_changed: req_datetime(row, "FirstChanged")?,
                            last_changed: req_datetime(row, "LastChanged")?,
                        })
                    },
                )
            },
        )
    }
}

fn map_status(row: &Row<'_>, include_navigation: bool) -> RepoResult<ApplicationStatus> {
    let navigation = if include_navigation {
        Some(ApplicationStatusNavigation {
            changed_by_username: opt_string(row, "ChangedByUsername")?,
        })
    } else {
        None
    };

    Ok(ApplicationStatus {
        id: req_i64(row, "ApplicationStatusID")?,
        application_id: req_i64(row, "ApplicationID")?,
        old_status: opt_string(row, "OldStatus")?,
        new_status: req_string(row, "NewStatus")?,
        changed_by: opt_i64(row, "ChangedBy")?,
        changed_date: req_datetime(row, "ChangedDate")?,
        comments: opt_string(row, "Comments")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
