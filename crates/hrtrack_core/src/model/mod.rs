//! Domain records persisted by the repository layer.
//!
//! # Invariants
//! - `id == 0` means "not yet persisted"; stored rows always have `id > 0`
//!   and identities are never reused.
//! - `created_date` is assigned by the repository on insert, never by callers.
//! - `updated_date` is assigned only by `update`.
//! - Navigation data is `None` unless the query variant joined it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod application;
pub mod organization;
pub mod people;
pub mod recruitment;

/// Integer identity shared by every entity kind.
pub type EntityId = i64;

/// Table and primary-key names for one entity kind.
///
/// Declared per entity instead of derived from the table name, so a key that
/// does not follow `{Table}ID` stays correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
}

/// Common shape of every persisted record.
pub trait Entity: Clone + Debug + Send + 'static {
    const TABLE: Table;

    fn id(&self) -> EntityId;

    fn is_persisted(&self) -> bool {
        self.id() > 0
    }
}

/// Maps the "0 means none" foreign-key convention to an `Option`.
pub(crate) fn optional_ref(id: EntityId) -> Option<EntityId> {
    (id > 0).then_some(id)
}

/// Well-known application status values. Storage stays free-form.
pub mod application_status {
    pub const SUBMITTED: &str = "Submitted";
    pub const SCREENING: &str = "Screening";
    pub const INTERVIEWING: &str = "Interviewing";
    pub const OFFERED: &str = "Offered";
    pub const HIRED: &str = "Hired";
    pub const REJECTED: &str = "Rejected";
    pub const WITHDRAWN: &str = "Withdrawn";
}

/// Well-known recruitment campaign status values.
pub mod campaign_status {
    pub const PLANNED: &str = "Planned";
    pub const RUNNING: &str = "Running";
    pub const COMPLETED: &str = "Completed";
    pub const CANCELLED: &str = "Cancelled";
}

/// Well-known job posting status values.
pub mod job_posting_status {
    pub const OPEN: &str = "Open";
    pub const CLOSED: &str = "Closed";
    pub const ON_HOLD: &str = "OnHold";
}
