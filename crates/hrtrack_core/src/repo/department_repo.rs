//! Department persistence, optionally enriched with the manager's name.

use super::base::{
    self, bool_to_int, fmt_datetime, now, opt_datetime, opt_i64, opt_string, req_bool, req_i64,
    req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::organization::{Department, DepartmentNavigation};
use crate::model::{Entity, EntityId};
use rusqlite::{params, Row};

const DEPARTMENT_COLUMNS: &str = "
    d.DepartmentID AS DepartmentID,
    d.DepartmentName AS DepartmentName,
    d.Description AS Description,
    d.ManagerID AS ManagerID,
    d.CurrentHeadcount AS CurrentHeadcount,
    d.MaxHeadcount AS MaxHeadcount,
    d.IsActive AS IsActive,
    d.CreatedDate AS CreatedDate,
    d.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {DEPARTMENT_COLUMNS},
                m.FullName AS ManagerName
             FROM Department d
             LEFT JOIN Employee m ON m.EmployeeID = d.ManagerID"
        )
    } else {
        format!("SELECT {DEPARTMENT_COLUMNS} FROM Department d")
    }
}

pub trait DepartmentRepository: Repository<Entity = Department> {
    /// Case-insensitive exact name match.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Department>>;
    fn get_active(&self) -> RepoResult<Vec<Department>>;
    /// Adds `delta` to `current_headcount`, clamping at zero.
    fn adjust_current_headcount(&self, id: EntityId, delta: i64) -> RepoResult<bool>;
}

pub struct SqliteDepartmentRepository {
    store: Store,
}

impl SqliteDepartmentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteDepartmentRepository {
    type Entity = Department;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Department>> {
        base::run(&self.store, Department::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE d.DepartmentID = ?1;", select_sql(true)),
                [id],
                |row| map_department(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Department>> {
        base::run(&self.store, Department::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY d.DepartmentName COLLATE NOCASE ASC, d.DepartmentID ASC;",
                    select_sql(true)
                ),
                [],
                |row| map_department(row, true),
            )
        })
    }

    fn add(&self, department: &Department) -> RepoResult<EntityId> {
        base::run(&self.store, Department::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Department (
                    DepartmentName,
                    Description,
                    ManagerID,
                    CurrentHeadcount,
                    MaxHeadcount,
                    IsActive,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    department.name.as_str(),
                    department.description.as_deref(),
                    department.manager_id,
                    department.current_headcount,
                    department.max_headcount,
                    bool_to_int(department.is_active),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, department: &Department) -> RepoResult<bool> {
        base::run(&self.store, Department::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Department
                 SET
                    DepartmentName = ?2,
                    Description = ?3,
                    ManagerID = ?4,
                    CurrentHeadcount = ?5,
                    MaxHeadcount = ?6,
                    IsActive = ?7,
                    UpdatedDate = ?8
                 WHERE DepartmentID = ?1;",
                params![
                    department.id,
                    department.name.as_str(),
                    department.description.as_deref(),
                    department.manager_id,
                    department.current_headcount,
                    department.max_headcount,
                    bool_to_int(department.is_active),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository {
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        base::run(&self.store, Department::TABLE, "get_by_name", |conn| {
            base::query_first(
                conn,
                &format!(
                    "{} WHERE d.DepartmentName = ?1 COLLATE NOCASE ORDER BY d.DepartmentID ASC LIMIT 1;",
                    select_sql(false)
                ),
                [name.trim()],
                |row| map_department(row, false),
            )
        })
    }

    fn get_active(&self) -> RepoResult<Vec<Department>> {
        base::run(&self.store, Department::TABLE, "get_active", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE d.IsActive = 1 ORDER BY d.DepartmentName COLLATE NOCASE ASC, d.DepartmentID ASC;",
                    select_sql(false)
                ),
                [],
                |row| map_department(row, false),
            )
        })
    }

    fn adjust_current_headcount(&self, id: EntityId, delta: i64) -> RepoResult<bool> {
        base::run(
            &self.store,
            Department::TABLE,
            "adjust_current_headcount",
            |conn| {
                base::execute_affected(
                    conn,
                    "UPDATE Department
                     SET
                        CurrentHeadcount = MAX(0, CurrentHeadcount + ?2),
                        UpdatedDate = ?3
                     WHERE DepartmentID = ?1;",
                    params![id, delta, fmt_datetime(now())],
                )
            },
        )
    }
}

fn map_department(row: &Row<'_>, include_navigation: bool) -> RepoResult<Department> {
    let navigation = if include_navigation {
        Some(DepartmentNavigation {
            manager_name: opt_string(row, "ManagerName")?,
        })
    } else {
        None
    };

    Ok(Department {
        id: req_i64(row, "DepartmentID")?,
        name: req_string(row, "DepartmentName")?,
        description: opt_string(row, "Description")?,
        manager_id: opt_i64(row, "ManagerID")?,
        current_headcount: req_i64(row, "CurrentHeadcount")?,
        max_headcount: req_i64(row, "MaxHeadcount")?,
        is_active: req_bool(row, "IsActive")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
