//! Candidate applications and everything recorded against them.

use super::{application_status, Entity, EntityId, Table};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Joined summary for an application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationNavigation {
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_title: String,
}

/// One candidate applying to one job posting.
///
/// At most one application per (candidate, job posting). The store does not
/// enforce it; callers run the duplicate check before inserting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: EntityId,
    pub candidate_id: EntityId,
    pub job_posting_id: EntityId,
    pub applied_date: NaiveDateTime,
    /// Live status. Every change is mirrored into the `ApplicationStatus` log.
    pub current_status: String,
    pub score: Option<Decimal>,
    pub notes: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<ApplicationNavigation>,
}

impl Application {
    pub fn new(candidate_id: EntityId, job_posting_id: EntityId, applied_date: NaiveDateTime) -> Self {
        Self {
            id: 0,
            candidate_id,
            job_posting_id,
            applied_date,
            current_status: application_status::SUBMITTED.to_string(),
            score: None,
            notes: None,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for Application {
    const TABLE: Table = Table {
        name: "Application",
        primary_key: "ApplicationID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for an audit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatusNavigation {
    /// `None` when the actor is unknown or the account was removed.
    pub changed_by_username: Option<String>,
}

/// One status transition of an application.
///
/// Append-only: only `comments` may change after insertion and rows are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub id: EntityId,
    pub application_id: EntityId,
    /// `None` for the initial entry.
    pub old_status: Option<String>,
    pub new_status: String,
    /// Acting user.
    pub changed_by: Option<EntityId>,
    pub changed_date: NaiveDateTime,
    pub comments: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<ApplicationStatusNavigation>,
}

impl ApplicationStatus {
    pub fn new(
        application_id: EntityId,
        old_status: Option<String>,
        new_status: impl Into<String>,
        changed_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            application_id,
            old_status,
            new_status: new_status.into(),
            changed_by: None,
            changed_date,
            comments: None,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for ApplicationStatus {
    const TABLE: Table = Table {
        name: "ApplicationStatus",
        primary_key: "ApplicationStatusID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Number of transitions into one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Aggregate view of transitions into one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStatistics {
    pub status: String,
    pub transitions: i64,
    pub applications: i64,
    pub first_changed: NaiveDateTime,
    pub last_changed: NaiveDateTime,
}

/// Joined summary for an interview row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewNavigation {
    pub interviewer_name: String,
    pub candidate_name: String,
    pub job_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: EntityId,
    pub application_id: EntityId,
    /// Interviewing employee.
    pub interviewer_id: EntityId,
    pub round: i64,
    pub interview_type: String,
    pub scheduled_date: NaiveDateTime,
    pub duration_minutes: Option<i64>,
    pub location: Option<String>,
    pub result: Option<String>,
    pub score: Option<Decimal>,
    pub feedback: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<InterviewNavigation>,
}

impl Interview {
    pub fn new(
        application_id: EntityId,
        interviewer_id: EntityId,
        interview_type: impl Into<String>,
        scheduled_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            application_id,
            interviewer_id,
            round: 1,
            interview_type: interview_type.into(),
            scheduled_date,
            duration_minutes: None,
            location: None,
            result: None,
            score: None,
            feedback: None,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for Interview {
    const TABLE: Table = Table {
        name: "Interview",
        primary_key: "InterviewID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Record of one outgoing email attempt about an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLog {
    pub id: EntityId,
    pub application_id: EntityId,
    pub recipient_email: String,
    pub subject: String,
    pub body: Option<String>,
    pub sent_date: NaiveDateTime,
    pub is_success: bool,
    /// Transport error text when `is_success` is false.
    pub error_message: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
}

impl EmailLog {
    pub fn sent(
        application_id: EntityId,
        recipient_email: impl Into<String>,
        subject: impl Into<String>,
        sent_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            application_id,
            recipient_email: recipient_email.into(),
            subject: subject.into(),
            body: None,
            sent_date,
            is_success: true,
            error_message: None,
            created_date: None,
            updated_date: None,
        }
    }

    pub fn failed(
        application_id: EntityId,
        recipient_email: impl Into<String>,
        subject: impl Into<String>,
        sent_date: NaiveDateTime,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            is_success: false,
            error_message: Some(error_message.into()),
            ..Self::sent(application_id, recipient_email, subject, sent_date)
        }
    }
}

impl Entity for EmailLog {
    const TABLE: Table = Table {
        name: "EmailLog",
        primary_key: "EmailLogID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
