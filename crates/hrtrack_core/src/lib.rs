//! Persistence core for recruitment and HR records.
//! Repositories here are the only code that talks to the store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::{DbError, DbResult, Store};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::application::{
    Application, ApplicationStatus, EmailLog, Interview, StatusCount, StatusStatistics,
};
pub use model::organization::{Department, Headcount, Position};
pub use model::people::{Candidate, Employee, User};
pub use model::recruitment::{CampaignJobPosting, JobPosting, RecruitmentCampaign};
pub use model::{Entity, EntityId, Table};
pub use repo::{FailOpen, RepoError, RepoResult, Repository};
pub use service::application_service::{ApplicationService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
