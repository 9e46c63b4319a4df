#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use hrtrack_core::model::application::Application;
use hrtrack_core::model::organization::{Department, Position};
use hrtrack_core::model::people::{Candidate, Employee, User};
use hrtrack_core::model::recruitment::{JobPosting, RecruitmentCampaign};
use hrtrack_core::repo::application_repo::SqliteApplicationRepository;
use hrtrack_core::repo::candidate_repo::SqliteCandidateRepository;
use hrtrack_core::repo::department_repo::SqliteDepartmentRepository;
use hrtrack_core::repo::employee_repo::SqliteEmployeeRepository;
use hrtrack_core::repo::job_posting_repo::SqliteJobPostingRepository;
use hrtrack_core::repo::position_repo::SqlitePositionRepository;
use hrtrack_core::repo::recruitment_campaign_repo::SqliteRecruitmentCampaignRepository;
use hrtrack_core::repo::user_repo::SqliteUserRepository;
use hrtrack_core::{EntityId, Repository, Store};
use tempfile::TempDir;

/// File-backed store; every repository call opens its own connection, so an
/// in-memory database would not survive between calls.
pub struct TestStore {
    _dir: TempDir,
    pub store: Store,
}

pub fn test_store() -> TestStore {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("hrtrack.sqlite3"));
    TestStore { _dir: dir, store }
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Timestamp with sub-microsecond precision, as `Local::now()` yields.
pub fn precise(year: i32, month: u32, day: u32, hour: u32, nanos: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_nano_opt(hour, 15, 30, nanos)
        .unwrap()
}

/// Minimal organization and hiring graph most tests start from.
pub struct Seed {
    pub department_id: EntityId,
    pub position_id: EntityId,
    pub employee_id: EntityId,
    pub user_id: EntityId,
    pub candidate_id: EntityId,
    pub job_posting_id: EntityId,
}

pub fn seed(store: &Store) -> Seed {
    let department_id = add_department(store, "Engineering");
    let position_id = add_position(store, "Software Engineer");
    let employee_id = add_employee(store, "E-001", "Grace Hopper", department_id, position_id);
    let user_id = add_user(store, employee_id, "ghopper");
    let candidate_id = add_candidate(store, "Ada Lovelace", "ada@example.com");
    let job_posting_id = add_job_posting(store, "Backend Engineer", department_id, position_id);
    Seed {
        department_id,
        position_id,
        employee_id,
        user_id,
        candidate_id,
        job_posting_id,
    }
}

pub fn add_department(store: &Store, name: &str) -> EntityId {
    SqliteDepartmentRepository::new(store.clone())
        .add(&Department::new(name, 10))
        .unwrap()
}

pub fn add_position(store: &Store, name: &str) -> EntityId {
    SqlitePositionRepository::new(store.clone())
        .add(&Position::new(name))
        .unwrap()
}

pub fn add_employee(
    store: &Store,
    code: &str,
    name: &str,
    department_id: EntityId,
    position_id: EntityId,
) -> EntityId {
    SqliteEmployeeRepository::new(store.clone())
        .add(&Employee::new(code, name, department_id, position_id))
        .unwrap()
}

pub fn add_user(store: &Store, employee_id: EntityId, username: &str) -> EntityId {
    SqliteUserRepository::new(store.clone())
        .add(&User::new(employee_id, username, "hash", "salt", "Recruiter"))
        .unwrap()
}

pub fn add_candidate(store: &Store, name: &str, email: &str) -> EntityId {
    SqliteCandidateRepository::new(store.clone())
        .add(&Candidate::new(name, email))
        .unwrap()
}

pub fn add_job_posting(
    store: &Store,
    title: &str,
    department_id: EntityId,
    position_id: EntityId,
) -> EntityId {
    SqliteJobPostingRepository::new(store.clone())
        .add(&JobPosting::new(title, department_id, position_id))
        .unwrap()
}

pub fn add_campaign(
    store: &Store,
    name: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: &str,
) -> EntityId {
    let mut campaign = RecruitmentCampaign::new(name, start, end);
    campaign.status = status.to_string();
    SqliteRecruitmentCampaignRepository::new(store.clone())
        .add(&campaign)
        .unwrap()
}

pub fn add_application(
    store: &Store,
    candidate_id: EntityId,
    job_posting_id: EntityId,
    applied_date: NaiveDateTime,
) -> EntityId {
    SqliteApplicationRepository::new(store.clone())
        .add(&Application::new(candidate_id, job_posting_id, applied_date))
        .unwrap()
}
