//! People: applicants, staff and the login accounts attached to staff.

use super::{Entity, EntityId, Table};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External applicant. Unique by email (case-insensitive lookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: EntityId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    /// Location of the uploaded resume document.
    pub resume_path: Option<String>,
    /// Free-form, usually comma separated.
    pub skills: Option<String>,
    pub years_of_experience: Option<i64>,
    pub education: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
}

impl Candidate {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: 0,
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            date_of_birth: None,
            gender: None,
            address: None,
            resume_path: None,
            skills: None,
            years_of_experience: None,
            education: None,
            created_date: None,
            updated_date: None,
        }
    }
}

impl Entity for Candidate {
    const TABLE: Table = Table {
        name: "Candidate",
        primary_key: "CandidateID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for an employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeNavigation {
    pub department_name: String,
    pub position_name: String,
}

/// Staff member. `employee_code` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub employee_code: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub department_id: EntityId,
    pub position_id: EntityId,
    pub salary: Option<Decimal>,
    pub status: String,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<EmployeeNavigation>,
}

impl Employee {
    pub fn new(
        employee_code: impl Into<String>,
        full_name: impl Into<String>,
        department_id: EntityId,
        position_id: EntityId,
    ) -> Self {
        Self {
            id: 0,
            employee_code: employee_code.into(),
            full_name: full_name.into(),
            email: None,
            phone: None,
            date_of_birth: None,
            hire_date: None,
            department_id,
            position_id,
            salary: None,
            status: "Active".to_string(),
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for Employee {
    const TABLE: Table = Table {
        name: "Employee",
        primary_key: "EmployeeID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Joined summary for a user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNavigation {
    pub employee_name: String,
    pub employee_code: String,
}

/// Login account bound to exactly one employee.
///
/// `password_hash` and `salt` are opaque to this crate: they are produced and
/// verified by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub employee_id: EntityId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing, default)]
    pub salt: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_date: Option<NaiveDateTime>,
    pub created_date: Option<NaiveDateTime>,
    pub updated_date: Option<NaiveDateTime>,
    pub navigation: Option<UserNavigation>,
}

impl User {
    pub fn new(
        employee_id: EntityId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        salt: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            username: username.into(),
            password_hash: password_hash.into(),
            salt: salt.into(),
            role: role.into(),
            is_active: true,
            last_login_date: None,
            created_date: None,
            updated_date: None,
            navigation: None,
        }
    }
}

impl Entity for User {
    const TABLE: Table = Table {
        name: "User",
        primary_key: "UserID",
    };

    fn id(&self) -> EntityId {
        self.id
    }
}
