//! Application persistence.
//!
//! # Invariants
//! - At most one application per (candidate, job posting). Nothing in the
//!   store enforces it: callers run `check_duplicate_application` before
//!   `add` (see `service::ApplicationService::submit`).
//! - `update_status` changes only the live field. The matching audit row is
//!   written separately through `ApplicationStatusRepository`.

use super::base::{
    self, fmt_datetime, fmt_decimal, now, opt_datetime, opt_decimal, opt_string, req_datetime,
    req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::application::{Application, ApplicationNavigation};
use crate::model::{Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

const APPLICATION_COLUMNS: &str = "
    a.ApplicationID AS ApplicationID,
    a.CandidateID AS CandidateID,
    a.JobPostingID AS JobPostingID,
    a.AppliedDate AS AppliedDate,
    a.CurrentStatus AS CurrentStatus,
    a.Score AS Score,
    a.Notes AS Notes,
    a.CreatedDate AS CreatedDate,
    a.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {APPLICATION_COLUMNS},
                c.FullName AS CandidateName,
                c.Email AS CandidateEmail,
                j.JobTitle AS JobTitle
             FROM Application a
             INNER JOIN Candidate c ON c.CandidateID = a.CandidateID
             INNER JOIN JobPosting j ON j.JobPostingID = a.JobPostingID"
        )
    } else {
        format!("SELECT {APPLICATION_COLUMNS} FROM Application a")
    }
}

pub trait ApplicationRepository: Repository<Entity = Application> {
    /// True when the candidate already applied to the job posting.
    fn check_duplicate_application(
        &self,
        candidate_id: EntityId,
        job_posting_id: EntityId,
    ) -> RepoResult<bool>;
    fn get_by_job_posting(&self, job_posting_id: EntityId) -> RepoResult<Vec<Application>>;
    fn get_by_candidate(&self, candidate_id: EntityId) -> RepoResult<Vec<Application>>;
    /// Case-insensitive match on the live status.
    fn get_by_status(&self, status: &str) -> RepoResult<Vec<Application>>;
    /// Applications with `applied_date` in `[from, to]`.
    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<Application>>;
    /// Overwrites the live status only.
    fn update_status(&self, id: EntityId, new_status: &str) -> RepoResult<bool>;
    fn count_by_status(&self, status: &str) -> RepoResult<i64>;
}

pub struct SqliteApplicationRepository {
    store: Store,
}

impl SqliteApplicationRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteApplicationRepository {
    type Entity = Application;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Application>> {
        base::run(&self.store, Application::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE a.ApplicationID = ?1;", select_sql(true)),
                [id],
                |row| map_application(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Application>> {
        base::run(&self.store, Application::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY a.AppliedDate DESC, a.ApplicationID DESC;",
                    select_sql(true)
                ),
                [],
                |row| map_application(row, true),
            )
        })
    }

    fn add(&self, application: &Application) -> RepoResult<EntityId> {
        base::run(&self.store, Application::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Application (
                    CandidateID,
                    JobPostingID,
                    AppliedDate,
                    CurrentStatus,
                    Score,
                    Notes,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    application.candidate_id,
                    application.job_posting_id,
                    fmt_datetime(application.applied_date),
                    application.current_status.as_str(),
                    application.score.map(fmt_decimal),
                    application.notes.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, application: &Application) -> RepoResult<bool> {
        base::run(&self.store, Application::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Application
                 SET
                    CandidateID = ?2,
                    JobPostingID = ?3,
                    AppliedDate = ?4,
                    CurrentStatus = ?5,
                    Score = ?6,
                    Notes = ?7,
                    UpdatedDate = ?8
                 WHERE ApplicationID = ?1;",
                params![
                    application.id,
                    application.candidate_id,
                    application.job_posting_id,
                    fmt_datetime(application.applied_date),
                    application.current_status.as_str(),
                    application.score.map(fmt_decimal),
                    application.notes.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn check_duplicate_application(
        &self,
        candidate_id: EntityId,
        job_posting_id: EntityId,
    ) -> RepoResult<bool> {
        base::run(
            &self.store,
            Application::TABLE,
            "check_duplicate_application",
            |conn| {
                let found = base::query_scalar(
                    conn,
                    "SELECT EXISTS(
                        SELECT 1 FROM Application
                        WHERE CandidateID = ?1 AND JobPostingID = ?2
                     );",
                    [candidate_id, job_posting_id],
                )?;
                Ok(found == 1)
            },
        )
    }

    fn get_by_job_posting(&self, job_posting_id: EntityId) -> RepoResult<Vec<Application>> {
        base::run(&self.store, Application::TABLE, "get_by_job_posting", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE a.JobPostingID = ?1 ORDER BY a.AppliedDate DESC, a.ApplicationID DESC;",
                    select_sql(true)
                ),
                [job_posting_id],
                |row| map_application(row, true),
            )
        })
    }

    fn get_by_candidate(&self, candidate_id: EntityId) -> RepoResult<Vec<Application>> {
        base::run(&self.store, Application::TABLE, "get_by_candidate", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE a.CandidateID = ?1 ORDER BY a.AppliedDate DESC, a.ApplicationID DESC;",
                    select_sql(true)
                ),
                [candidate_id],
                |row| map_application(row, true),
            )
        })
    }

    fn get_by_status(&self, status: &str) -> RepoResult<Vec<Application>> {
        base::run(&self.store, Application::TABLE, "get_by_status", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE a.CurrentStatus = ?1 COLLATE NOCASE ORDER BY a.AppliedDate DESC, a.ApplicationID DESC;",
                    select_sql(false)
                ),
                [status.trim()],
                |row| map_application(row, false),
            )
        })
    }

    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<Application>> {
        base::run(&self.store, Application::TABLE, "get_by_date_range", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE a.AppliedDate >= ?1 AND a.AppliedDate <= ?2
                     ORDER BY a.AppliedDate DESC, a.ApplicationID DESC;",
                    select_sql(false)
                ),
                params![fmt_datetime(from), fmt_datetime(to)],
                |row| map_application(row, false),
            )
        })
    }

    fn update_status(&self, id: EntityId, new_status: &str) -> RepoResult<bool> {
        base::run(&self.store, Application::TABLE, "update_status", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Application
                 SET CurrentStatus = ?2, UpdatedDate = ?3
                 WHERE ApplicationID = ?1;",
                params![id, new_status.trim(), fmt_datetime(now())],
            )
        })
    }

    fn count_by_status(&self, status: &str) -> RepoResult<i64> {
        base::run(&self.store, Application::TABLE, "count_by_status", |conn| {
            base::query_scalar(
                conn,
                "SELECT COUNT(*) FROM Application WHERE CurrentStatus = ?1 COLLATE NOCASE;",
                [status.trim()],
            )
        })
    }
}

fn map_application(row: &Row<'_>, include_navigation: bool) -> RepoResult<Application> {
    let navigation = if include_navigation {
        Some(ApplicationNavigation {
            candidate_name: req_string(row, "CandidateName")?,
            candidate_email: req_string(row, "CandidateEmail")?,
            job_title: req_string(row, "JobTitle")?,
        })
    } else {
        None
    };

    Ok(Application {
        id: req_i64(row, "ApplicationID")?,
        candidate_id: req_i64(row, "CandidateID")?,
        job_posting_id: req_i64(row, "JobPostingID")?,
        applied_date: req_datetime(row, "AppliedDate")?,
        current_status: req_string(row, "CurrentStatus")?,
        score: opt_decimal(row, "Score")?,
        notes: opt_string(row, "Notes")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
