//! Hiring demand: campaigns, job postings and the campaign membership link.

use super::{campaign_status, optional_ref, Entity, EntityId, Table};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Time-boxed hiring drive grouping several job postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentCampaign {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: String,
    pub budget: Option<Decimal>,
    /// User who created the campaign, if known.
    pub created_by: Option<EntityId>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
}

impl RecruitmentCampaign {
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            start_date,
            end_date,
            status: campaign_status::PLANNED.to_string(),
            budget: None,
            created_by: None,
            created_date: None,
            updated_date: None,
        }
    }

    /// Running (case-insensitive) and `now` within `[start_date, end_date]`.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        self.status.eq_ignore_ascii_case(campaign_status::RUNNING)
            && self.start_date <= now
            && now <= self.end_date
    }
}

impl Entity for RecruitmentCampaign {
    const TABLE: Table = Table {
        name: "RecruitmentCampaign",
        primary_key: "CampaignID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for a job posting row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostingNavigation {
    pub department_name: String,
    pub position_name: String,
    /// `None` when the posting is not attached to a campaign.
    pub campaign_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: EntityId,
    pub title: String,
    pub department_id: EntityId,
    pub position_id: EntityId,
    /// Owning campaign; `0` means none and is stored as NULL.
    pub campaign_id: EntityId,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub vacancy_count: i64,
    pub deadline: Option<NaiveDateTime>,
    pub status: String,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<JobPostingNavigation>,
}

impl JobPosting {
    pub fn new(title: impl Into<String>, department_id: EntityId, position_id: EntityId) -> Self {
        Self {
            id: 0,
            title: title.into(),
            department_id,
            position_id,
            campaign_id: 0,
            description: None,
            requirements: None,
            min_salary: None,
            max_salary: None,
            vacancy_count: 1,
            deadline: None,
            status: super::job_posting_status::OPEN.to_string(),
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }

    /// Campaign link, `None` for 0. Also the value bound to `CampaignID`, so
    /// an unlinked posting stores NULL.
    pub fn campaign(&self) -> Option<EntityId> {
        optional_ref(self.campaign_id)
    }
}

impl Entity for JobPosting {
    const TABLE: Table = Table {
        name: "JobPosting",
        primary_key: "JobPostingID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for a campaign membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignJobPostingNavigation {
    pub campaign_name: String,
    pub job_title: String,
}

/// Many-to-many link between campaigns and job postings.
///
/// A (campaign, job posting) pair appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignJobPosting {
    pub id: EntityId,
    pub campaign_id: EntityId,
    pub job_posting_id: EntityId,
    pub added_date: NaiveDateTime,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<CampaignJobPostingNavigation>,
}

impl CampaignJobPosting {
    pub fn new(campaign_id: EntityId, job_posting_id: EntityId, added_date: NaiveDateTime) -> Self {
        Self {
            id: 0,
            campaign_id,
            job_posting_id,
            added_date,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for CampaignJobPosting {
    const TABLE: Table = Table {
        name: "CampaignJobPosting",
        primary_key: "CampaignJobPostingID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
