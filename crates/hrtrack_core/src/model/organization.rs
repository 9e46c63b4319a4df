//! Organizational structure: departments, positions and planned headcount.

use super::{Entity, EntityId, Table};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Joined summary for a department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentNavigation {
    /// `None` when the department has no manager.
    pub manager_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    /// Managing employee, if one is assigned.
    pub manager_id: Option<EntityId>,
    pub current_headcount: i64,
    pub max_headcount: i64,
    pub is_active: bool,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<DepartmentNavigation>,
}

impl Department {
    pub fn new(name: impl Into<String>, max_headcount: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            manager_id: None,
            current_headcount: 0,
            max_headcount,
            is_active: true,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }

    /// Whether another person can join without exceeding `max_headcount`.
    /// A `max_headcount` of zero means "no cap".
    pub fn has_capacity(&self) -> bool {
        self.max_headcount == 0 || self.current_headcount < self.max_headcount
    }
}

impl Entity for Department {
    const TABLE: Table = Table {
        name: "Department",
        primary_key: "DepartmentID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Job role with a salary band and seniority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub is_active: bool,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
}

impl Position {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: None,
            level: None,
            min_salary: None,
            max_salary: None,
            is_active: true,
            created_date: None,
            updated_date: None,
        }
    }

    /// Open bounds accept any amount on that side.
    pub fn salary_band_contains(&self, amount: Decimal) -> bool {
        self.min_salary.map_or(true, |min| amount >= min)
            && self.max_salary.map_or(true, |max| amount <= max)
    }
}

impl Entity for Position {
    const TABLE: Table = Table {
        name: "Position",
        primary_key: "PositionID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for a headcount row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadcountNavigation {
    pub department_name: String,
    pub position_name: String,
}

/// Planning allotment for one (department, position, year).
///
/// Not a live counter: `filled_count` is maintained explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub id: EntityId,
    pub department_id: EntityId,
    pub position_id: EntityId,
    pub year: i64,
    pub approved_count: i64,
    pub filled_count: i64,
    pub notes: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<HeadcountNavigation>,
}

impl Headcount {
    pub fn new(department_id: EntityId, position_id: EntityId, year: i64, approved: i64) -> Self {
        Self {
            id: 0,
            department_id,
            position_id,
            year,
            approved_count: approved,
            filled_count: 0,
            notes: None,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }

    /// Approved slots not yet filled, never negative.
    pub fn remaining(&self) -> i64 {
        (self.approved_count - self.filled_count).max(0)
    }
}

impl Entity for Headcount {
    const TABLE: Table = Table {
        name: "Headcount",
        primary_key: "HeadcountID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
