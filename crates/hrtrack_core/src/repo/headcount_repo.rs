//! Headcount allotments keyed by (department, position, year).
//!
//! # Invariants
//! - One row per key. `add` checks before inserting and returns
//!   `RepoError::Duplicate`; the lookup by key returns at most one row.
//! - `FilledCount` is a planning figure, not a live counter of employees.

use super::base::{self, fmt_datetime, now, opt_datetime, opt_string, req_i64, req_string};
use super::{RepoError, RepoResult, Repository};
use crate::db::Store;
use crate::model::organization::{Headcount, HeadcountNavigation};
use crate::model::{Entity, EntityId};
use rusqlite::{params, Connection, Row};

const HEADCOUNT_COLUMNS: &str = "
    h.HeadcountID AS HeadcountID,
    h.DepartmentID AS DepartmentID,
    h.PositionID AS PositionID,
    h.Year AS Year,
    h.ApprovedCount AS ApprovedCount,
    h.FilledCount AS FilledCount,
    h.Notes AS Notes,
    h.CreatedDate AS CreatedDate,
    h.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {HEADCOUNT_COLUMNS},
                d.DepartmentName AS DepartmentName,
                p.PositionName AS PositionName
             FROM Headcount h
             INNER JOIN Department d ON d.DepartmentID = h.DepartmentID
             INNER JOIN Position p ON p.PositionID = h.PositionID"
        )
    } else {
        format!("SELECT {HEADCOUNT_COLUMNS} FROM Headcount h")
    }
}

pub trait HeadcountRepository: Repository<Entity = Headcount> {
    fn get_by_department_position_year(
        &self,
        department_id: EntityId,
        position_id: EntityId,
        year: i64,
    ) -> RepoResult<Option<Headcount>>;
    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<Headcount>>;
    fn get_by_year(&self, year: i64) -> RepoResult<Vec<Headcount>>;
    /// Adds `delta` to `filled_count`, clamping at zero.
    fn increment_filled(&self, id: EntityId, delta: i64) -> RepoResult<bool>;
}

pub struct SqliteHeadcountRepository {
    store: Store,
}

impl SqliteHeadcountRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

fn key_exists(
    conn: &Connection,
    department_id: EntityId,
    position_id: EntityId,
    year: i64,
) -> RepoResult<bool> {
    let found = base::query_scalar(
        conn,
        "SELECT EXISTS(
            SELECT 1 FROM Headcount
            WHERE DepartmentID = ?1 AND PositionID = ?2 AND Year = ?3
         );",
        [department_id, position_id, year],
    )?;
    Ok(found == 1)
}

impl Repository for SqliteHeadcountRepository {
    type Entity = Headcount;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Headcount>> {
        base::run(&self.store, Headcount::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE h.HeadcountID = ?1;", select_sql(true)),
                [id],
                |row| map_headcount(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Headcount>> {
        base::run(&self.store, Headcount::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY h.Year DESC, d.DepartmentName COLLATE NOCASE ASC, p.PositionName COLLATE NOCASE ASC;",
                    select_sql(true)
                ),
                [],
                |row| map_headcount(row, true),
            )
        })
    }

    fn add(&self, headcount: &Headcount) -> RepoResult<EntityId> {
        base::run(&self.store, Headcount::TABLE, "add", |conn| {
            if key_exists(
                conn,
                headcount.department_id,
                headcount.position_id,
                headcount.year,
            )? {
                return Err(RepoError::Duplicate {
                    entity: Headcount::TABLE.name,
                    key: format!(
                        "department_id={} position_id={} year={}",
                        headcount.department_id, headcount.position_id, headcount.year
                    ),
                });
            }
            base::insert(
                conn,
                "INSERT INTO Headcount (
                    DepartmentID,
                    PositionID,
                    Year,
                    ApprovedCount,
                    FilledCount,
                    Notes,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    headcount.department_id,
                    headcount.position_id,
                    headcount.year,
                    headcount.approved_count,
                    headcount.filled_count,
                    headcount.notes.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, headcount: &Headcount) -> RepoResult<bool> {
        base::run(&self.store, Headcount::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Headcount
                 SET
                    DepartmentID = ?2,
                    PositionID = ?3,
                    Year = ?4,
                    ApprovedCount = ?5,
                    FilledCount = ?6,
                    Notes = ?7,
                    UpdatedDate = ?8
                 WHERE HeadcountID = ?1;",
                params![
                    headcount.id,
                    headcount.department_id,
                    headcount.position_id,
                    headcount.year,
                    headcount.approved_count,
                    headcount.filled_count,
                    headcount.notes.as_deref(),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl HeadcountRepository for SqliteHeadcountRepository {
    fn get_by_department_position_year(
        &self,
        department_id: EntityId,
        position_id: EntityId,
        year: i64,
    ) -> RepoResult<Option<Headcount>> {
        base::run(
            &self.store,
            Headcount::TABLE,
            "get_by_department_position_year",
            |conn| {
                base::query_first(
                    conn,
                    &format!(
                        "{} WHERE h.DepartmentID = ?1 AND h.PositionID = ?2 AND h.Year = ?3
                         ORDER BY h.HeadcountID ASC
                         LIMIT 1;",
                        select_sql(true)
                    ),
                    [department_id, position_id, year],
                    |row| map_headcount(row, true),
                )
            },
        )
    }

    fn get_by_department(&self, department_id: EntityId) -> RepoResult<Vec<Headcount>> {
        base::run(&self.store, Headcount::TABLE, "get_by_department", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE h.DepartmentID = ?1 ORDER BY h.Year DESC, h.PositionID ASC;",
                    select_sql(false)
                ),
                [department_id],
                |row| map_headcount(row, false),
            )
        })
    }

    fn get_by_year(&self, year: i64) -> RepoResult<Vec<Headcount>> {
        base::run(&self.store, Headcount::TABLE, "get_by_year", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE h.Year = ?1 ORDER BY d.DepartmentName COLLATE NOCASE ASC, p.PositionName COLLATE NOCASE ASC;",
                    select_sql(true)
                ),
                [year],
                |row| map_headcount(row, true),
            )
        })
    }

    fn increment_filled(&self, id: EntityId, delta: i64) -> RepoResult<bool> {
        base::run(&self.store, Headcount::TABLE, "increment_filled", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Headcount
                 SET FilledCount = MAX(0, FilledCount + ?2), UpdatedDate = ?3
                 WHERE HeadcountID = ?1;",
                params![id, delta, fmt_datetime(now())],
            )
        })
    }
}

fn map_headcount(row: &Row<'_>, include_navigation: bool) -> RepoResult<Headcount> {
    let navigation = if include_navigation {
        Some(HeadcountNavigation {
            department_name: req_string(row, "DepartmentName")?,
            position_name: req_string(row, "PositionName")?,
        })
    } else {
        None
    };

    Ok(Headcount {
        id: req_i64(row, "HeadcountID")?,
        department_id: req_i64(row, "DepartmentID")?,
        position_id: req_i64(row, "PositionID")?,
        year: req_i64(row, "Year")?,
        approved_count: req_i64(row, "ApprovedCount")?,
        filled_count: req_i64(row, "FilledCount")?,
        notes: opt_string(row, "Notes")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
