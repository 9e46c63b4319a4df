//! Campaign membership of job postings.
//!
//! # Invariants
//! - A (campaign, job posting) pair is stored at most once. `add` checks
//!   before inserting and returns `RepoError::Duplicate`; the unique index
//!   backs it up for writers that bypass this repository.

use super::base::{self, fmt_datetime, now, opt_datetime, req_datetime, req_i64, req_string};
use super::job_posting_repo::{self, map_job_posting};
use super::recruitment_campaign_repo::{map_campaign, CAMPAIGN_SELECT_SQL};
use super::{RepoError, RepoResult, Repository};
use crate::db::Store;
use crate::model::recruitment::{
    CampaignJobPosting, CampaignJobPostingNavigation, JobPosting, RecruitmentCampaign,
};
use crate::model::{Entity, EntityId};
use rusqlite::{params, Connection, Row};

const LINK_COLUMNS: &str = "
    cjp.CampaignJobPostingID AS CampaignJobPostingID,
    cjp.CampaignID AS CampaignID,
    cjp.JobPostingID AS JobPostingID,
    cjp.AddedDate AS AddedDate,
    cjp.CreatedDate AS CreatedDate,
    cjp.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {LINK_COLUMNS},
                rc.CampaignName AS CampaignName,
                j.JobTitle AS JobTitle
             FROM CampaignJobPosting cjp
             INNER JOIN RecruitmentCampaign rc ON rc.CampaignID = cjp.CampaignID
             INNER JOIN JobPosting j ON j.JobPostingID = cjp.JobPostingID"
        )
    } else {
        format!("SELECT {LINK_COLUMNS} FROM CampaignJobPosting cjp")
    }
}

pub trait CampaignJobPostingRepository: Repository<Entity = CampaignJobPosting> {
    fn is_in_campaign(&self, campaign_id: EntityId, job_posting_id: EntityId) -> RepoResult<bool>;
    /// Deletes the pair's link row. Returns whether one existed.
    fn remove_from_campaign(
        &self,
        campaign_id: EntityId,
        job_posting_id: EntityId,
    ) -> RepoResult<bool>;
    /// Link rows of one campaign, with campaign name and job title.
    fn get_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<CampaignJobPosting>>;
    fn get_job_postings_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<JobPosting>>;
    fn get_campaigns_by_job_posting(
        &self,
        job_posting_id: EntityId,
    ) -> RepoResult<Vec<RecruitmentCampaign>>;
    fn count_by_campaign(&self, campaign_id: EntityId) -> RepoResult<i64>;
}

pub struct SqliteCampaignJobPostingRepository {
    store: Store,
}

impl SqliteCampaignJobPostingRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn pair_exists(conn: &Connection, campaign_id: EntityId, job_posting_id: EntityId) -> RepoResult<bool> {
    let found = base::query_scalar(
        conn,
        "SELECT EXISTS(
            SELECT 1 FROM CampaignJobPosting
            WHERE CampaignID = ?1 AND JobPostingID = ?2
         );",
        [campaign_id, job_posting_id],
    )?;
    Ok(found == 1)
}

impl Repository for SqliteCampaignJobPostingRepository {
    type Entity = CampaignJobPosting;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<CampaignJobPosting>> {
        base::run(&self.store, CampaignJobPosting::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE cjp.CampaignJobPostingID = ?1;", select_sql(true)),
                [id],
                |row| map_link(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<CampaignJobPosting>> {
        base::run(&self.store, CampaignJobPosting::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY cjp.AddedDate DESC, cjp.CampaignJobPostingID DESC;",
                    select_sql(true)
                ),
                [],
                |row| map_link(row, true),
            )
        })
    }

    fn add(&self, link: &CampaignJobPosting) -> RepoResult<EntityId> {
        base::run(&self.store, CampaignJobPosting::TABLE, "add", |conn| {
            if pair_exists(conn, link.campaign_id, link.job_posting_id)? {
                return Err(RepoError::Duplicate {
                    entity: CampaignJobPosting::TABLE.name,
                    key: format!(
                        "campaign_id={} job_posting_id={}",
                        link.campaign_id, link.job_posting_id
                    ),
                });
            }
            base::insert(
                conn,
                "INSERT INTO CampaignJobPosting (
                    CampaignID,
                    JobPostingID,
                    AddedDate,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    link.campaign_id,
                    link.job_posting_id,
                    fmt_datetime(link.added_date),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, link: &CampaignJobPosting) -> RepoResult<bool> {
        base::run(&self.store, CampaignJobPosting::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE CampaignJobPosting
                 SET
                    CampaignID = ?2,
                    JobPostingID = ?3,
                    AddedDate = ?4,
                    UpdatedDate = ?5
                 WHERE CampaignJobPostingID = ?1;",
                params![
                    link.id,
                    link.campaign_id,
                    link.job_posting_id,
                    fmt_datetime(link.added_date),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl CampaignJobPostingRepository for SqliteCampaignJobPostingRepository {
    fn is_in_campaign(&self, campaign_id: EntityId, job_posting_id: EntityId) -> RepoResult<bool> {
        base::run(&self.store, CampaignJobPosting::TABLE, "is_in_campaign", |conn| {
            pair_exists(conn, campaign_id, job_posting_id)
        })
    }

    fn remove_from_campaign(
        &self,
        campaign_id: EntityId,
        job_posting_id: EntityId,
    ) -> RepoResult<bool> {
        base::run(
            &self.store,
            CampaignJobPosting::TABLE,
            "remove_from_campaign",
            |conn| {
                base::execute_affected(
                    conn,
                    "DELETE FROM CampaignJobPosting WHERE CampaignID = ?1 AND JobPostingID = ?2;",
                    [campaign_id, job_posting_id],
                )
            },
        )
    }

    fn get_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<CampaignJobPosting>> {
        base::run(&self.store, CampaignJobPosting::TABLE, "get_by_campaign", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE cjp.CampaignID = ?1 ORDER BY cjp.AddedDate ASC, cjp.CampaignJobPostingID ASC;",
                    select_sql(true)
                ),
                [campaign_id],
                |row| map_link(row, true),
            )
        })
    }

    fn get_job_postings_by_campaign(&self, campaign_id: EntityId) -> RepoResult<Vec<JobPosting>> {
        base::run(
            &self.store,
            CampaignJobPosting::TABLE,
            "get_job_postings_by_campaign",
            |conn| {
                base::query_all(
                    conn,
                    &format!(
                        "{}
                         INNER JOIN CampaignJobPosting cjp ON cjp.JobPostingID = j.JobPostingID
                         WHERE cjp.CampaignID = ?1
                         ORDER BY cjp.AddedDate ASC, j.JobPostingID ASC;",
                        job_posting_repo::select_sql(true)
                    ),
                    [campaign_id],
                    |row| map_job_posting(row, true),
                )
            },
        )
    }

    fn get_campaigns_by_job_posting(
        &self,
        job_posting_id: EntityId,
    ) -> RepoResult<Vec<RecruitmentCampaign>> {
        base::run(
            &self.store,
            CampaignJobPosting::TABLE,
            "get_campaigns_by_job_posting",
            |conn| {
                base::query_all(
                    conn,
                    &format!(
                        "{CAMPAIGN_SELECT_SQL}
                         INNER JOIN CampaignJobPosting cjp ON cjp.CampaignID = rc.CampaignID
                         WHERE cjp.JobPostingID = ?1
                         ORDER BY rc.StartDate DESC, rc.CampaignID DESC;"
                    ),
                    [job_posting_id],
                    map_campaign,
                )
            },
        )
    }

    fn count_by_campaign(&self, campaign_id: EntityId) -> RepoResult<i64> {
        base::run(&self.store, CampaignJobPosting::TABLE, "count_by_campaign", |conn| {
            base::query_scalar(
                conn,
                "SELECT COUNT(*) FROM CampaignJobPosting WHERE CampaignID = ?1;",
                [campaign_id],
            )
        })
    }
}

fn map_link(row: &Row<'_>, include_navigation: bool) -> RepoResult<CampaignJobPosting> {
    let navigation = if include_navigation {
        Some(CampaignJobPostingNavigation {
            campaign_name: req_string(row, "CampaignName")?,
            job_title: req_string(row, "JobTitle")?,
        })
    } else {
        None
    };

    Ok(CampaignJobPosting {
        id: req_i64(row, "CampaignJobPostingID")?,
        campaign_id: req_i64(row, "CampaignID")?,
        job_posting_id: req_i64(row, "JobPostingID")?,
        added_date: req_datetime(row, "AddedDate")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
