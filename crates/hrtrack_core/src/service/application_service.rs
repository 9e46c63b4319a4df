//! Application lifecycle service.
//!
//! # Invariants
//! - `submit` never inserts a second application for the same
//!   (candidate, job posting).
//! - Every status written through this service has a matching audit row.
//!   The live update and the audit insert are two separate writes; a failure
//!   between them leaves the audit trail one entry behind.

use crate::model::application::{Application, ApplicationStatus};
use crate::model::EntityId;
use crate::repo::application_repo::ApplicationRepository;
use crate::repo::application_status_repo::ApplicationStatusRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("candidate {candidate_id} already applied to job posting {job_posting_id}")]
    DuplicateApplication {
        candidate_id: EntityId,
        job_posting_id: EntityId,
    },
    #[error("application not found: {0}")]
    ApplicationNotFound(EntityId),
    /// A write succeeded but its read-back did not find the row.
    #[error("inconsistent application state: {0}")]
    InconsistentState(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct ApplicationService<A, S>
where
    A: ApplicationRepository,
    S: ApplicationStatusRepository,
{
    applications: A,
    statuses: S,
}

impl<A, S> ApplicationService<A, S>
where
    A: ApplicationRepository,
    S: ApplicationStatusRepository,
{
    pub fn new(applications: A, statuses: S) -> Self {
        Self {
            applications,
            statuses,
        }
    }

    pub fn applications(&self) -> &A {
        &self.applications
    }

    pub fn statuses(&self) -> &S {
        &self.statuses
    }

    /// Inserts a new application and its initial audit row.
    ///
    /// Rejects the call before writing anything when the candidate already
    /// applied to the same job posting.
    pub fn submit(
        &self,
        application: &Application,
        changed_by: Option<EntityId>,
    ) -> Result<Application, ServiceError> {
        let (candidate_id, job_posting_id) = (application.candidate_id, application.job_posting_id);
        if self
            .applications
            .check_duplicate_application(candidate_id, job_posting_id)?
        {
            info!(
                "event=application_submit module=service status=rejected candidate_id={} job_posting_id={}",
                candidate_id, job_posting_id
            );
            return Err(ServiceError::DuplicateApplication {
                candidate_id,
                job_posting_id,
            });
        }

        let id = self.applications.add(application)?;
        self.statuses.record_transition(
            id,
            None,
            application.current_status.as_str(),
            changed_by,
            None,
        )?;
        info!(
            "event=application_submit module=service status=ok application_id={} candidate_id={} job_posting_id={}",
            id, candidate_id, job_posting_id
        );

        self.applications
            .get_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "submitted application not found in read-back",
            ))
    }

    /// Moves an application to `new_status` and appends the transition.
    pub fn change_status(
        &self,
        application_id: EntityId,
        new_status: &str,
        changed_by: Option<EntityId>,
        comments: Option<&str>,
    ) -> Result<ApplicationStatus, ServiceError> {
        let current = self
            .applications
            .get_by_id(application_id)?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        if !self.applications.update_status(application_id, new_status)? {
            return Err(ServiceError::ApplicationNotFound(application_id));
        }
        let entry_id = self.statuses.record_transition(
            application_id,
            Some(current.current_status.as_str()),
            new_status,
            changed_by,
            comments,
        )?;
        info!(
            "event=application_status_change module=service status=ok application_id={} old_status={} new_status={}",
            application_id,
            current.current_status,
            new_status.trim()
        );

        self.statuses
            .get_by_id(entry_id)?
            .ok_or(ServiceError::InconsistentState(
                "status transition not found in read-back",
            ))
    }

    /// Audit trail of one application, oldest first.
    pub fn history(&self, application_id: EntityId) -> RepoResult<Vec<ApplicationStatus>> {
        self.statuses.get_by_application_id(application_id)
    }

    pub fn latest_status(&self, application_id: EntityId) -> RepoResult<Option<ApplicationStatus>> {
        self.statuses.get_latest_status(application_id)
    }
}
