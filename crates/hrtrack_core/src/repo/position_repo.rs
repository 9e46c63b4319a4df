//! Position persistence.

use super::base::{
    self, bool_to_int, fmt_datetime, fmt_decimal, now, opt_datetime, opt_decimal, opt_string,
    req_bool, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::organization::Position;
use crate::model::{Entity, EntityId};
use rusqlite::{params, Row};

const POSITION_SELECT_SQL: &str = "SELECT
    PositionID,
    PositionName,
    Description,
    Level,
    MinSalary,
    MaxSalary,
    IsActive,
    CreatedDate,
    UpdatedDate
FROM Position";

pub trait PositionRepository: Repository<Entity = Position> {
    /// Case-insensitive match on the seniority level.
    fn get_by_level(&self, level: &str) -> RepoResult<Vec<Position>>;
    fn get_active(&self) -> RepoResult<Vec<Position>>;
}

pub struct SqlitePositionRepository {
    store: Store,
}

impl SqlitePositionRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqlitePositionRepository {
    type Entity = Position;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Position>> {
        base::run(&self.store, Position::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{POSITION_SELECT_SQL} WHERE PositionID = ?1;"),
                [id],
                map_position,
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Position>> {
        base::run(&self.store, Position::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!("{POSITION_SELECT_SQL} ORDER BY PositionName COLLATE NOCASE ASC, PositionID ASC;"),
                [],
                map_position,
            )
        })
    }

    fn add(&self, position: &Position) -> RepoResult<EntityId> {
        base::run(&self.store, Position::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO Position (
                    PositionName,
                    Description,
                    Level,
                    MinSalary,
                    MaxSalary,
                    IsActive,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    position.name.as_str(),
                    position.description.as_deref(),
                    position.level.as_deref(),
                    position.min_salary.map(fmt_decimal),
                    position.max_salary.map(fmt_decimal),
                    bool_to_int(position.is_active),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    fn update(&self, position: &Position) -> RepoResult<bool> {
        base::run(&self.store, Position::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE Position
                 SET
                    PositionName = ?2,
                    Description = ?3,
                    Level = ?4,
                    MinSalary = ?5,
                    MaxSalary = ?6,
                    IsActive = ?7,
                    UpdatedDate = ?8
                 WHERE PositionID = ?1;",
                params![
                    position.id,
                    position.name.as_str(),
                    position.description.as_deref(),
                    position.level.as_deref(),
                    position.min_salary.map(fmt_decimal),
                    position.max_salary.map(fmt_decimal),
                    bool_to_int(position.is_active),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl PositionRepository for SqlitePositionRepository {
    fn get_by_level(&self, level: &str) -> RepoResult<Vec<Position>> {
        base::run(&self.store, Position::TABLE, "get_by_level", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{POSITION_SELECT_SQL}
                     WHERE Level = ?1 COLLATE NOCASE
                     ORDER BY PositionName COLLATE NOCASE ASC, PositionID ASC;"
                ),
                [level.trim()],
                map_position,
            )
        })
    }

    fn get_active(&self) -> RepoResult<Vec<Position>> {
        base::run(&self.store, Position::TABLE, "get_active", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{POSITION_SELECT_SQL}
                     WHERE IsActive = 1
                     ORDER BY PositionName COLLATE NOCASE ASC, PositionID ASC;"
                ),
                [],
                map_position,
            )
        })
    }
}

fn map_position(row: &Row<'_>) -> RepoResult<Position> {
    Ok(Position {
        id: req_i64(row, "PositionID")?,
        name: req_string(row, "PositionName")?,
        description: opt_string(row, "Description")?,
        level: opt_string(row, "Level")?,
        min_salary: opt_decimal(row, "MinSalary")?,
        max_salary: opt_decimal(row, "MaxSalary")?,
        is_active: req_bool(row, "IsActive")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
    })
}
