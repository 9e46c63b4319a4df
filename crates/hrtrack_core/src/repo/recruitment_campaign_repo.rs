//! Recruitment campaign persistence.
//!
//! The table's key is `CampaignID`, not `RecruitmentCampaignID`; the explicit
//! `Entity::TABLE` constant keeps the shared delete/exists queries correct.

use super::base::{
    self, fmt_datetime, fmt_decimal, now, opt_datetime, opt_decimal, opt_i64, opt_string,
    req_datetime, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::recruitment::RecruitmentCampaign;
use crate::model::{campaign_status, Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

pub(crate) const CAMPAIGN_SELECT_SQL: &str = "SELECT
    rc.CampaignID AS CampaignID,
    rc.CampaignName AS CampaignName,
    rc.Description AS Description,
    rc.StartDate AS StartDate,
    rc.EndDate AS EndDate,
    rc.Status AS Status,
    rc.Budget AS Budget,
    rc.CreatedBy AS CreatedBy,
    rc.CreatedDate AS CreatedDate,
    rc.UpdatedDate AS UpdatedDate
FROM RecruitmentCampaign rc";

pub trait RecruitmentCampaignRepository: Repository<Entity = RecruitmentCampaign> {
    /// Campaigns whose status is running and whose window contains `now`.
    fn get_active_campaigns(&self, now: NaiveDateTime) -> RepoResult<Vec<RecruitmentCampaign>>;
    /// Case-insensitive status match.
    fn get_by_status(&self, status: &str) -> RepoResult<Vec<RecruitmentCampaign>>;
}

pub struct SqliteRecruitmentCampaignRepository {
    store: Store,
}

impl SqliteRecruitmentCampaignRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteRecruitmentCampaignRepository {
    type Entity = RecruitmentCampaign;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<RecruitmentCampaign>> {
        base::run(&self.store, RecruitmentCampaign::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{CAMPAIGN_SELECT_SQL} WHERE rc.CampaignID = ?1;"),
                [id],
                map_campaign,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<RecruitmentCampaign>> {
        base::run(&self.store, RecruitmentCampaign::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!("{CAMPAIGN_SELECT_SQL} ORDER BY rc.StartDate DESC, rc.CampaignID DESC;"),
                [],
                map_campaign,
            )
        })
    }

    fn add(&self, campaign: &RecruitmentCampaign) -> RepoResult<EntityId> {
        base::run(&self.store, RecruitmentCampaign::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO RecruitmentCampaign (
                    CampaignName,
                    Description,
                    StartDate,
                    EndDate,
                    Status,
                    Budget,
                    CreatedBy,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    campaign.name.as_str(),
                    campaign.description.as_deref(),
                    fmt_datetime(campaign.start_date),
                    fmt_datetime(campaign.end_date),
                    campaign.status.as_str(),
                    campaign.budget.map(fmt_decimal),
                    campaign.created_by,
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, campaign: &RecruitmentCampaign) -> RepoResult<bool> {
        base::run(&self.store, RecruitmentCampaign::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE RecruitmentCampaign
                 SET
                    CampaignName = ?2,
                    Description = ?3,
                    StartDate = ?4,
                    EndDate = ?5,
                    Status = ?6,
                    Budget = ?7,
                    UpdatedDate = ?8
                 WHERE CampaignID = ?1;",
                params![
                    campaign.id,
                    campaign.name.as_str(),
                    campaign.description.as_deref(),
                    fmt_datetime(campaign.start_date),
                    fmt_datetime(campaign.end_date),
                    campaign.status.as_str(),
                    campaign.budget.map(fmt_decimal),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl RecruitmentCampaignRepository for SqliteRecruitmentCampaignRepository {
    fn get_active_campaigns(&self, now: NaiveDateTime) -> RepoResult<Vec<RecruitmentCampaign>> {
        base::run(
            &self.store,
            RecruitmentCampaign::TABLE,
            "get_active_campaigns",
            |conn| {
                base::query_all(
                    conn,
                    &format!(
                        "{CAMPAIGN_SELECT_SQL}
                         WHERE rc.Status = ?1 COLLATE NOCASE
                           AND rc.StartDate <= ?2
                           AND rc.EndDate >= ?2
                         ORDER BY rc.EndDate ASC, rc.CampaignID ASC;"
                    ),
                    params![campaign_status::RUNNING, fmt_datetime(now)],
                    map_campaign,
                )
            },
        )
    }

    fn get_by_status(&self, status: &str) -> RepoResult<Vec<RecruitmentCampaign>> {
        base::run(&self.store, RecruitmentCampaign::TABLE, "get_by_status", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{CAMPAIGN_SELECT_SQL}
                     WHERE rc.Status = ?1 COLLATE NOCASE
                     ORDER BY rc.StartDate DESC, rc.CampaignID DESC;"
                ),
                [status.trim()],
                map_campaign,
            )
        })
    }
}

pub(crate) fn map_campaign(row: &Row<'_>) -> RepoResult<RecruitmentCampaign> {
    Ok(RecruitmentCampaign {
        id: req_i64(row, "CampaignID")?,
        name: req_string(row, "CampaignName")?,
        description: opt_string(row, "Description")?,
        start_date: req_datetime(row, "StartDate")?,
        end_date: req_datetime(row, "EndDate")?,
        status: req_string(row, "Status")?,
        budget: opt_decimal(row, "Budget")?,
        created_by: opt_i64(row, "CreatedBy")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
    })
}
