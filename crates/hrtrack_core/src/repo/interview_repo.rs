//! Interview persistence, optionally enriched with interviewer, candidate and
//! job title.

use super::base::{
    self, fmt_datetime, fmt_decimal, like_contains, now, opt_datetime, opt_decimal, opt_i64,
    opt_string, req_datetime, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::application::{Interview, InterviewNavigation};
use crate::model::{Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

const INTERVIEW_COLUMNS: &str = "
    i.InterviewID AS InterviewID,
    i.ApplicationID AS ApplicationID,
    i.InterviewerID AS InterviewerID,
    i.Round AS Round,
    i.InterviewType AS InterviewType,
    i.ScheduledDate AS ScheduledDate,
    i.DurationMinutes AS DurationMinutes,
    i.Location AS Location,
    i.Result AS Result,
    i.Score AS Score,
    i.Feedback AS Feedback,
    i.CreatedDate AS CreatedDate,
    i.UpdatedDate AS UpdatedDate";

const NAVIGATION_JOINS: &str = "
    INNER JOIN Employee e ON e.EmployeeID = i.InterviewerID
    INNER JOIN Application a ON a.ApplicationID = i.ApplicationID
    INNER JOIN Candidate c ON c.CandidateID = a.CandidateID
    INNER JOIN JobPosting j ON j.JobPostingID = a.JobPostingID";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {INTERVIEW_COLUMNS},
                e.FullName AS InterviewerName,
                c.FullName AS CandidateName,
                j.JobTitle AS JobTitle
             FROM Interview i {NAVIGATION_JOINS}"
        )
    } else {
        format!("SELECT {INTERVIEW_COLUMNS} FROM Interview i")
    }
}

pub trait InterviewRepository: Repository<Entity = Interview> {
    /// Rounds of one application in round order.
    fn get_by_application(&self, application_id: EntityId) -> RepoResult<Vec<Interview>>;
    fn get_by_interviewer(&self, interviewer_id: EntityId) -> RepoResult<Vec<Interview>>;
    /// Substring match on the interviewing employee's full name.
    fn get_by_interviewer_name(&self, name: &str) -> RepoResult<Vec<Interview>>;
    /// Interviews scheduled at or after `now`, soonest first.
    fn get_upcoming(&self, now: NaiveDateTime) -> RepoResult<Vec<Interview>>;
    /// Interviews scheduled in `[from, to]`.
    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<Interview>>;
}

pub struct SqliteInterviewRepository {
    store: Store,
}

impl SqliteInterviewRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn query_enriched(
        &self,
        operation: &'static str,
        tail: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Interview>> {
        base::run(&self.store, Interview::TABLE, operation, |conn| {
            base::query_all(
                conn,
                &format!("{} {tail};", select_sql(true)),
                params,
                |row| map_interview(row, true),
            )
        })
    }
}

impl Repository for SqliteInterviewRepository {
    type Entity = Interview;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Interview>> {
        base::run(&self.store, Interview::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE i.InterviewID = ?1;", select_sql(true)),
                [id],
                |row| map_interview(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Interview>> {
        self.query_enriched(
            "get_all",
            "ORDER BY i.ScheduledDate DESC, i.InterviewID DESC",
            [],
        )
    }

    fn add(&self, interview: &Interview) -> RepoResult<EntityId> {
        base::run(&self.store, Interview::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Interview (
                    ApplicationID,
                    InterviewerID,
                    Round,
                    InterviewType,
                    ScheduledDate,
                    DurationMinutes,
                    Location,
                    Result,
                    Score,
                    Feedback,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    interview.application_id,
                    interview.interviewer_id,
                    interview.round,
                    interview.interview_type.as_str(),
                    fmt_datetime(interview.scheduled_date),
                    interview.duration_minutes,
                    interview.location.as_deref(),
                    interview.result.as_deref(),
                    interview.score.map(fmt_decimal),
                    interview.feedback.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, interview: &Interview) -> RepoResult<bool> {
        base::run(&self.store, Interview::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Interview
                 SET
                    ApplicationID = ?2,
                    InterviewerID = ?3,
                    Round = ?4,
                    InterviewType = ?5,
                    ScheduledDate = ?6,
                    DurationMinutes = ?7,
                    Location = ?8,
                    Result = ?9,
                    Score = ?10,
                    Feedback = ?11,
                    UpdatedDate = ?12
                 WHERE InterviewID = ?1;",
                params![
                    interview.id,
                    interview.application_id,
                    interview.interviewer_id,
                    interview.round,
                    interview.interview_type.as_str(),
                    fmt_datetime(interview.scheduled_date),
                    interview.duration_minutes,
                    interview.location.as_deref(),
                    interview.result.as_deref(),
                    interview.score.map(fmt_decimal),
                    interview.feedback.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl InterviewRepository for SqliteInterviewRepository {
    fn get_by_application(&self, application_id: EntityId) -> RepoResult<Vec<Interview>> {
        base::run(&self.store, Interview::TABLE, "get_by_application", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE i.ApplicationID = ?1 ORDER BY i.Round ASC, i.ScheduledDate ASC, i.InterviewID ASC;",
                    select_sql(false)
                ),
                [application_id],
                |row| map_interview(row, false),
            )
        })
    }

    fn get_by_interviewer(&self, interviewer_id: EntityId) -> RepoResult<Vec<Interview>> {
        base::run(&self.store, Interview::TABLE, "get_by_interviewer", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE i.InterviewerID = ?1 ORDER BY i.ScheduledDate DESC, i.InterviewID DESC;",
                    select_sql(false)
                ),
                [interviewer_id],
                |row| map_interview(row, false),
            )
        })
    }

    fn get_by_interviewer_name(&self, name: &str) -> RepoResult<Vec<Interview>> {
        self.query_enriched(
            "get_by_interviewer_name",
            "WHERE e.FullName LIKE ?1 ESCAPE '\\'
             ORDER BY i.ScheduledDate DESC, i.InterviewID DESC",
            [like_contains(name)],
        )
    }

    fn get_upcoming(&self, now: NaiveDateTime) -> RepoResult<Vec<Interview>> {
        self.query_enriched(
            "get_upcoming",
            "WHERE i.ScheduledDate >= ?1 ORDER BY i.ScheduledDate ASC, i.InterviewID ASC",
            [fmt_datetime(now)],
        )
    }

    fn get_by_date_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepoResult<Vec<Interview>> {
        self.query_enriched(
            "get_by_date_range",
            "WHERE i.ScheduledDate >= ?1 AND i.ScheduledDate <= ?2
             ORDER BY i.ScheduledDate ASC, i.InterviewID ASC",
            params![fmt_datetime(from), fmt_datetime(to)],
        )
    }
}

fn map_interview(row: &Row<'_>, include_navigation: bool) -> RepoResult<Interview> {
    let navigation = if include_navigation {
        Some(InterviewNavigation {
            interviewer_name: req_string(row, "InterviewerName")?,
            candidate_name: req_string(row, "CandidateName")?,
            job_title: req_string(row, "JobTitle")?,
        })
    } else {
        None
    };

    Ok(Interview {
        id: req_i64(row, "InterviewID")?,
        application_id: req_i64(row, "ApplicationID")?,
        interviewer_id: req_i64(row, "InterviewerID")?,
        round: req_i64(row, "Round")?,
        interview_type: req_string(row, "InterviewType")?,
        scheduled_date: req_datetime(row, "ScheduledDate")?,
        duration_minutes: opt_i64(row, "DurationMinutes")?,
        location: opt_string(row, "Location")?,
        result: opt_string(row, "Result")?,
        score: opt_decimal(row, "Score")?,
        feedback: opt_string(row, "Feedback")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
