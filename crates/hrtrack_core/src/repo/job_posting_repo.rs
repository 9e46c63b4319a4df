//! Job posting persistence, optionally enriched with department, position and
//! campaign names.

use super::base::{
    self, fmt_datetime, fmt_decimal, now, opt_datetime, opt_decimal, opt_i64, opt_string,
    req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::recruitment::{JobPosting, JobPostingNavigation};
use crate::model::{job_posting_status, Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

const JOB_POSTING_COLUMNS: &str = "
    j.JobPostingID AS JobPostingID,
    j.JobTitle AS JobTitle,
    j.DepartmentID AS DepartmentID,
    j.PositionID AS PositionID,
    j.CampaignID AS CampaignID,
    j.Description AS Description,
    j.Requirements AS Requirements,
    j.MinSalary AS MinSalary,
    j.MaxSalary AS MaxSalary,
    j.VacancyCount AS VacancyCount,
    j.Deadline AS Deadline,
    j.Status AS Status,
    j.CreatedDate AS CreatedDate,
    j.UpdatedDate AS UpdatedDate";

/// Base SELECT over `JobPosting j`; other repositories append their own joins.
pub(crate) fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {JOB_POSTING_COLUMNS},
                d.DepartmentName AS DepartmentName,
                p.PositionName AS PositionName,
                rc.CampaignName AS CampaignName
             FROM JobPosting j
             INNER JOIN Department d ON d.DepartmentID = j.DepartmentID
             INNER JOIN Position p ON p.PositionID = j.PositionID
             LEFT JOIN RecruitmentCampaign rc ON rc.CampaignID = j.CampaignID"
        )
    } else {
        format!("SELECT {JOB_POSTING_COLUMNS} FROM JobPosting j")
    }
}

pub trait JobPostingRepository: Repository<Entity = JobPosting> {
    /// Case-insensitive status match.
    fn get_by_status(&self, status: &str) -> RepoResult<Vec<JobPosting>>;
    /// Open postings whose deadline is unset or not yet passed at `now`.
    fn get_open(&self, now: NaiveDateTime) -> RepoResult<Vec<JobPosting>>;
    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<JobPosting>>;
    /// Postings whose direct `campaign_id` points at the campaign.
    fn get_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<JobPosting>>;
}

pub struct SqliteJobPostingRepository {
    store: Store,
}

impl SqliteJobPostingRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn query_where(
        &self,
        operation: &'static str,
        clause: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<JobPosting>> {
        base::run(&self.store, JobPosting::TABLE, operation, |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE {clause} ORDER BY j.CreatedDate DESC, j.JobPostingID DESC;",
                    select_sql(false)
                ),
                params,
                |row| map_job_posting(row, false),
            )
        })
    }
}

impl Repository for SqliteJobPostingRepository {
    type Entity = JobPosting;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<JobPosting>> {
        base::run(&self.store, JobPosting::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE j.JobPostingID = ?1;", select_sql(true)),
                [id],
                |row| map_job_posting(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<JobPosting>> {
        base::run(&self.store, JobPosting::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY j.CreatedDate DESC, j.JobPostingID DESC;",
                    select_sql(true)
                ),
                [],
                |row| map_job_posting(row, true),
            )
        })
    }

    fn add(&self, posting: &JobPosting) -> RepoResult<EntityId> {
        base::run(&self.store, JobPosting::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO JobPosting (
                    JobTitle,
                    DepartmentID,
                    PositionID,
                    CampaignID,
                    Description,
                    Requirements,
                    MinSalary,
                    MaxSalary,
                    VacancyCount,
                    Deadline,
                    Status,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
                params![
                    posting.title.as_str(),
                    posting.department_id,
                    posting.position_id,
                    posting.campaign(),
                    posting.description.as_deref(),
                    posting.requirements.as_deref(),
                    posting.min_salary.map(fmt_decimal),
                    posting.max_salary.map(fmt_decimal),
                    posting.vacancy_count,
                    posting.deadline.map(fmt_datetime),
                    posting.status.as_str(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, posting: &JobPosting) -> RepoResult<bool> {
        base::run(&self.store, JobPosting::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE JobPosting
                 SET
                    JobTitle = ?2,
                    DepartmentID = ?3,
                    PositionID = ?4,
                    CampaignID = ?5,
                    Description = ?6,
                    Requirements = ?7,
                    MinSalary = ?8,
                    MaxSalary = ?9,
                    VacancyCount = ?10,
                    Deadline = ?11,
                    Status = ?12,
                    UpdatedDate = ?13
                 WHERE JobPostingID = ?1;",
                params![
                    posting.id,
                    posting.title.as_str(),
                    posting.department_id,
                    posting.position_id,
                    posting.campaign(),
                    posting.description.as_deref(),
                    posting.requirements.as_deref(),
                    posting.min_salary.map(fmt_decimal),
                    posting.max_salary.map(fmt_decimal),
                    posting.vacancy_count,
                    posting.deadline.map(fmt_datetime),
                    posting.status.as_str(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl JobPostingRepository for SqliteJobPostingRepository {
    fn get_by_status(&self, status: &str) -> RepoResult<Vec<JobPosting>> {
        self.query_where("get_by_status", "j.Status = ?1 COLLATE NOCASE", [status.trim()])
    }

    fn get_open(&self, now: NaiveDateTime) -> RepoResult<Vec<JobPosting>> {
        self.query_where(
            "get_open",
            "j.Status = ?1 COLLATE NOCASE AND (j.Deadline IS NULL OR j.Deadline >= ?2)",
            params![job_posting_status::OPEN, fmt_datetime(now)],
        )
    }

    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<JobPosting>> {
        self.query_where("get_by_department", "j.DepartmentID = ?1", [department_id])
    }

    fn get_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<JobPosting>> {
        self.query_where("get_by_campaign", "j.CampaignID = ?1", [campaign_id])
    }
}

pub(crate) fn map_job_posting(row: &Row<'_>, include_navigation: bool) -> RepoResult<JobPosting> {
    let navigation = if include_navigation {
        Some(JobPostingNavigation {
            department_name: req_string(row, "DepartmentName")?,
            position_name: req_string(row, "PositionName")?,
            campaign_name: opt_string(row, "CampaignName")?,
        })
    } else {
        None
    };

    Ok(JobPosting {
        id: req_i64(row, "JobPostingID")?,
        title: req_string(row, "JobTitle")?,
        department_id: req_i64(row, "DepartmentID")?,
        position_id: req_i64(row, "PositionID")?,
        campaign_id: opt_i64(row, "CampaignID")?.unwrap_or(0),
        description: opt_string(row, "Description")?,
        requirements: opt_string(row, "Requirements")?,
        min_salary: opt_decimal(row, "MinSalary")?,
        max_salary: opt_decimal(row, "MaxSalary")?,
        vacancy_count: req_i64(row, "VacancyCount")?,
        deadline: opt_datetime(row, "Deadline")?,
        status: req_string(row, "Status")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
