//! Employee persistence, optionally enriched with department and position names.
//!
//! # Invariants
//! - `EmployeeCode` is unique (store index); `code_exists` lets callers check
//!   before inserting instead of relying on the constraint error.

use super::base::{
    self, fmt_date, fmt_datetime, fmt_decimal, like_contains, now, opt_date, opt_datetime,
    opt_decimal, opt_string, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::people::{Employee, EmployeeNavigation};
use crate::model::{Entity, EntityId};
use rusqlite::{params, Row};

const EMPLOYEE_COLUMNS: &str = "
    e.EmployeeID AS EmployeeID,
    e.EmployeeCode AS EmployeeCode,
    e.FullName AS FullName,
    e.Email AS Email,
    e.Phone AS Phone,
    e.DateOfBirth AS DateOfBirth,
    e.HireDate AS HireDate,
    e.DepartmentID AS DepartmentID,
    e.PositionID AS PositionID,
    e.Salary AS Salary,
    e.Status AS Status,
    e.CreatedDate AS CreatedDate,
    e.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {EMPLOYEE_COLUMNS},
                d.DepartmentName AS DepartmentName,
                p.PositionName AS PositionName
             FROM Employee e
             INNER JOIN Department d ON d.DepartmentID = e.DepartmentID
             INNER JOIN Position p ON p.PositionID = e.PositionID"
        )
    } else {
        format!("SELECT {EMPLOYEE_COLUMNS} FROM Employee e")
    }
}

pub trait EmployeeRepository: Repository<Entity = Employee> {
    fn get_by_code(&self, employee_code: &str) -> RepoResult<Option<Employee>>;
    fn code_exists(&self, employee_code: &str) -> RepoResult<bool>;
    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<Employee>>;
    /// Substring match on the full name.
    fn search_by_name(&self, name: &str) -> RepoResult<Vec<Employee>>;
}

pub struct SqliteEmployeeRepository {
    store: Store,
}

impl SqliteEmployeeRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteEmployeeRepository {
    type Entity = Employee;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Employee>> {
        base::run(&self.store, Employee::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE e.EmployeeID = ?1;", select_sql(true)),
                [id],
                |row| map_employee(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        base::run(&self.store, Employee::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY e.CreatedDate DESC, e.EmployeeID DESC;",
                    select_sql(true)
                ),
                [],
                |row| map_employee(row, true),
            )
        })
    }

    fn add(&self, employee: &Employee) -> RepoResult<EntityId> {
        base::run(&self.store, Employee::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Employee (
                    EmployeeCode,
                    FullName,
                    Email,
                    Phone,
                    DateOfBirth,
                    HireDate,
                    DepartmentID,
                    PositionID,
                    Salary,
                    Status,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
                params![
                    employee.employee_code.trim(),
                    employee.full_name.as_str(),
                    employee.email.as_deref(),
                    employee.phone.as_deref(),
                    employee.date_of_birth.map(fmt_date),
                    employee.hire_date.map(fmt_date),
                    employee.department_id,
                    employee.position_id,
                    employee.salary.map(fmt_decimal),
                    employee.status.as_str(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, employee: &Employee) -> RepoResult<bool> {
        base::run(&self.store, Employee::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Employee
                 SET
                    EmployeeCode = ?2,
                    FullName = ?3,
                    Email = ?4,
                    Phone = ?5,
                    DateOfBirth = ?6,
                    HireDate = ?7,
                    DepartmentID = ?8,
                    PositionID = ?9,
                    Salary = ?10,
                    Status = ?11,
                    UpdatedDate = ?12
                 WHERE EmployeeID = ?1;",
                params![
                    employee.id,
                    employee.employee_code.trim(),
                    employee.full_name.as_str(),
                    employee.email.as_deref(),
                    employee.phone.as_deref(),
                    employee.date_of_birth.map(fmt_date),
                    employee.hire_date.map(fmt_date),
                    employee.department_id,
                    employee.position_id,
                    employee.salary.map(fmt_decimal),
                    employee.status.as_str(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository {
    fn get_by_code(&self, employee_code: &str) -> RepoResult<Option<Employee>> {
        base::run(&self.store, Employee::TABLE, "get_by_code", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE e.EmployeeCode = ?1;", select_sql(true)),
                [employee_code.trim()],
                |row| map_employee(row, true),
            )
        })
    }

    fn code_exists(&self, employee_code: &str) -> RepoResult<bool> {
        base::run(&self.store, Employee::TABLE, "code_exists", |conn| {
            let found = base::query_scalar(
                conn,
                "SELECT EXISTS(SELECT 1 FROM Employee WHERE EmployeeCode = ?1);",
                [employee_code.trim()],
            )?;
            Ok(found == 1)
        })
    }

    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<Employee>> {
        base::run(&self.store, Employee::TABLE, "get_by_department", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE e.DepartmentID = ?1 ORDER BY e.FullName COLLATE NOCASE ASC, e.EmployeeID ASC;",
                    select_sql(false)
                ),
                [department_id],
                |row| map_employee(row, false),
            )
        })
    }

    fn search_by_name(&self, name: &str) -> RepoResult<Vec<Employee>> {
        base::run(&self.store, Employee::TABLE, "search_by_name", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE e.FullName LIKE ?1 ESCAPE '\\' ORDER BY e.FullName COLLATE NOCASE ASC, e.EmployeeID ASC;",
                    select_sql(false)
                ),
                [like_contains(name)],
                |row| map_employee(row, false),
            )
        })
    }
}

fn map_employee(row: &Row<'_>, include_navigation: bool) -> RepoResult<Employee> {
    let navigation = if include_navigation {
        Some(EmployeeNavigation {
            department_name: req_string(row, "DepartmentName")?,
            position_name: req_string(row, "PositionName")?,
        })
    } else {
        None
    };

    Ok(Employee {
        id: req_i64(row, "EmployeeID")?,
        employee_code: req_string(row, "EmployeeCode")?,
        full_name: req_string(row, "FullName")?,
        email: opt_string(row, "Email")?,
        phone: opt_string(row, "Phone")?,
        date_of_birth: opt_date(row, "DateOfBirth")?,
        hire_date: opt_date(row, "HireDate")?,
        department_id: req_i64(row, "DepartmentID")?,
        position_id: req_i64(row, "PositionID")?,
        salary: opt_decimal(row, "Salary")?,
        status: req_string(row, "Status")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
