//! Outgoing email attempts recorded per application.

use super::base::{
    self, bool_to_int, fmt_datetime, now, opt_datetime, opt_string, req_bool, req_datetime,
    req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::application::EmailLog;
use crate::model::{Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

const EMAIL_LOG_SELECT_SQL: &str = "SELECT
    EmailLogID,
    ApplicationID,
    RecipientEmail,
    Subject,
    Body,
    SentDate,
    IsSuccess,
    ErrorMessage,
    CreatedDate,
    UpdatedDate
FROM EmailLog";

pub trait EmailLogRepository: Repository<Entity = EmailLog> {
    fn get_by_application(&self, application_id: EntityId) -> RepoResult<Vec<EmailLog>>;
    fn get_failed(&self) -> RepoResult<Vec<EmailLog>>;
    /// Attempts with `sent_date` in `[from, to]`.
    fn get_by_date_range(&self, from: NaiveDateTime, to: NaiveDateTime)
        -> RepoResult<Vec<EmailLog>>;
    fn count_failed(&self) -> RepoResult<i64>;
}

pub struct SqliteEmailLogRepository {
    store: Store,
}

impl SqliteEmailLogRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteEmailLogRepository {
    type Entity = EmailLog;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<EmailLog>> {
        base::run(&self.store, EmailLog::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{EMAIL_LOG_SELECT_SQL} WHERE EmailLogID = ?1;"),
                [id],
                map_email_log,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<EmailLog>> {
        base::run(&self.store, EmailLog::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!("{EMAIL_LOG_SELECT_SQL} ORDER BY SentDate DESC, EmailLogID DESC;"),
                [],
                map_email_log,
            )
        })
    }

    fn add(&self, entry: &EmailLog) -> RepoResult<EntityId> {
        base::run(&self.store, EmailLog::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO EmailLog (
                    ApplicationID,
                    RecipientEmail,
                    Subject,
                    Body,
                    SentDate,
                    IsSuccess,
                    ErrorMessage,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    entry.application_id,
                    entry.recipient_email.trim(),
                    entry.subject.as_str(),
                    entry.body.as_deref(),
                    fmt_datetime(entry.sent_date),
                    bool_to_int(entry.is_success),
                    entry.error_message.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, entry: &EmailLog) -> RepoResult<bool> {
        base::run(&self.store, EmailLog::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE EmailLog
                 SET
                    ApplicationID = ?2,
                    RecipientEmail = ?3,
                    Subject = ?4,
                    Body = ?5,
                    SentDate = ?6,
                    IsSuccess = ?7,
                    ErrorMessage = ?8,
                    UpdatedDate = ?9
                 WHERE EmailLogID = ?1;",
                params![
                    entry.id,
                    entry.application_id,
                    entry.recipient_email.trim(),
                    entry.subject.as_str(),
                    entry.body.as_deref(),
                    fmt_datetime(entry.sent_date),
                    bool_to_int(entry.is_success),
                    entry.error_message.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl EmailLogRepository for SqliteEmailLogRepository {
    fn get_by_application(&self, application_id: EntityId) -> RepoResult<Vec<EmailLog>> {
        base::run(&self.store, EmailLog::TABLE, "get_by_application", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{EMAIL_LOG_SELECT_SQL} WHERE ApplicationID = ?1 ORDER BY SentDate DESC, EmailLogID DESC;"
                ),
                [application_id],
                map_email_log,
            )
        })
    }

    fn get_failed(&self) -> RepoResult<Vec<EmailLog>> {
        base::run(&self.store, EmailLog::TABLE, "get_failed", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{EMAIL_LOG_SELECT_SQL} WHERE IsSuccess = 0 ORDER BY SentDate DESC, EmailLogID DESC;"
                ),
                [],
                map_email_log,
            )
        })
    }

    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<EmailLog>> {
        base::run(&self.store, EmailLog::TABLE, "get_by_date_range", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{EMAIL_LOG_SELECT_SQL}
                     WHERE SentDate >= ?1 AND SentDate <= ?2
                     ORDER BY SentDate ASC, EmailLogID ASC;"
                ),
                params![fmt_datetime(from), fmt_datetime(to)],
                map_email_log,
            )
        })
    }

    fn count_failed(&self) -> RepoResult<i64> {
        base::run(&self.store, EmailLog::TABLE, "count_failed", |conn| {
            base::query_scalar(conn, "SELECT COUNT(*) FROM EmailLog WHERE IsSuccess = 0;", [])
        })
    }
}

fn map_email_log(row: &Row<'_>) -> RepoResult<EmailLog> {
    Ok(EmailLog {
        id: req_i64(row, "EmailLogID")?,
        application_id: req_i64(row, "ApplicationID")?,
        recipient_email: req_string(row, "RecipientEmail")?,
        subject: req_string(row, "Subject")?,
        body: opt_string(row, "Body")?,
        sent_date: req_datetime(row, "SentDate")?,
        is_success: req_bool(row, "IsSuccess")?,
        error_message: opt_string(row, "ErrorMessage")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
    })
}
