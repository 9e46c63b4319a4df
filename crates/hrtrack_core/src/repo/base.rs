//! Shared repository plumbing: connection-scoped execution, default
//! delete/count/exists/find, and null-safe column readers and writers.
//!
//! # Invariants
//! - [`run`] is the only way repositories obtain a connection; the connection
//!   is dropped before `run` returns.
//! - Every optional column is read through an `opt_*` reader. `req_*`
//!   readers turn a missing or NULL column into `RepoError::Mapping`.
//! - Datetimes are written as `YYYY-MM-DD HH:MM:SS.fffffffff`: fixed-width
//!   nanoseconds, so text order equals chronological order and nothing is
//!   lost between write and read.

use super::{RepoError, RepoResult};
use crate::db::Store;
use crate::logging::sanitize_for_log;
use crate::model::{EntityId, Table};
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, error};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Instant;

const DATETIME_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";
const DATE_WRITE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_READ_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Runs `op` on a fresh connection and logs the outcome.
///
/// The connection is owned by this frame, so it is closed on every exit
/// path, including early returns from `op` via `?`.
pub fn run<T>(
    store: &Store,
    table: Table,
    operation: &'static str,
    op: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let started_at = Instant::now();
    let result = store
        .connect()
        .map_err(RepoError::from)
        .and_then(|conn| op(&conn));

    match &result {
        Ok(_) => debug!(
            "event=repo_call module=repo status=ok entity={} op={} duration_ms={}",
            table.name,
            operation,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=repo_call module=repo status=error entity={} op={} duration_ms={} error={}",
            table.name,
            operation,
            started_at.elapsed().as_millis(),
            sanitize_for_log(&err.to_string())
        ),
    }

    result
}

/// Collects every row produced by `sql`.
pub fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(map(row)?);
    }
    Ok(items)
}

/// Maps the first row produced by `sql`, if any.
pub fn query_first<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(map(row)?)),
        None => Ok(None),
    }
}

/// Runs a single-value aggregate such as `COUNT(*)` or `EXISTS(...)`.
pub fn query_scalar<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<i64> {
    let value = conn
        .query_row(sql, params, |row| row.get::<_, Option<i64>>(0))
        .optional()?
        .flatten();
    Ok(value.unwrap_or(0))
}

/// Executes an INSERT and returns the generated identity.
pub fn insert<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<EntityId> {
    conn.execute(sql, params)?;
    Ok(conn.last_insert_rowid())
}

/// Executes an UPDATE/DELETE and reports whether any row was affected.
pub fn execute_affected<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<bool> {
    Ok(conn.execute(sql, params)? > 0)
}

pub fn delete_by_id(store: &Store, table: Table, id: EntityId) -> RepoResult<bool> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ?1;",
        table.name, table.primary_key
    );
    run(store, table, "delete", |conn| {
        execute_affected(conn, &sql, [id])
    })
}

pub fn count_rows(store: &Store, table: Table) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {};", table.name);
    run(store, table, "count", |conn| query_scalar(conn, &sql, []))
}

pub fn row_exists(store: &Store, table: Table, id: EntityId) -> RepoResult<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
        table.name, table.primary_key
    );
    run(store, table, "exists", |conn| {
        Ok(query_scalar(conn, &sql, [id])? == 1)
    })
}

/// In-memory filter behind the default `find`.
pub fn filter_rows<T>(rows: Vec<T>, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
    rows.into_iter().filter(|row| predicate(row)).collect()
}

/// Clock used for `created_date`/`updated_date` stamps and "now" queries.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn fmt_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_WRITE_FORMAT).to_string()
}

pub fn fmt_date(value: NaiveDate) -> String {
    value.format(DATE_WRITE_FORMAT).to_string()
}

pub fn fmt_decimal(value: Decimal) -> String {
    value.to_string()
}

pub fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Builds a `%value%` LIKE pattern; pair with `ESCAPE '\'` in SQL.
pub fn like_contains(value: &str) -> String {
    let escaped = value
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn value_ref<'row>(row: &'row Row<'_>, column: &str) -> RepoResult<ValueRef<'row>> {
    row.get_ref(column)
        .map_err(|err| RepoError::mapping(column, err.to_string()))
}

fn text<'v>(column: &str, bytes: &'v [u8]) -> RepoResult<&'v str> {
    std::str::from_utf8(bytes).map_err(|err| RepoError::mapping(column, err.to_string()))
}

fn unexpected(column: &str, expected: &str, value: ValueRef<'_>) -> RepoError {
    RepoError::mapping(
        column,
        format!("expected {expected}, found {:?}", value.data_type()),
    )
}

fn required<T>(column: &str, value: Option<T>) -> RepoResult<T> {
    value.ok_or_else(|| RepoError::mapping(column, "unexpected NULL in required column"))
}

pub fn opt_string(row: &Row<'_>, column: &str) -> RepoResult<Option<String>> {
    match value_ref(row, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => Ok(Some(text(column, bytes)?.to_string())),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(value.to_string())),
        other => Err(unexpected(column, "text", other)),
    }
}

pub fn opt_i64(row: &Row<'_>, column: &str) -> RepoResult<Option<i64>> {
    match value_ref(row, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value)),
        ValueRef::Text(bytes) => {
            let raw = text(column, bytes)?;
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|_| RepoError::mapping(column, format!("invalid integer `{raw}`")))
        }
        other => Err(unexpected(column, "integer", other)),
    }
}

pub fn opt_bool(row: &Row<'_>, column: &str) -> RepoResult<Option<bool>> {
    match opt_i64(row, column)? {
        None => Ok(None),
        Some(0) => Ok(Some(false)),
        Some(1) => Ok(Some(true)),
        Some(other) => Err(RepoError::mapping(
            column,
            format!("invalid boolean value `{other}`"),
        )),
    }
}

pub fn opt_decimal(row: &Row<'_>, column: &str) -> RepoResult<Option<Decimal>> {
    match value_ref(row, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let raw = text(column, bytes)?;
            Decimal::from_str(raw.trim())
                .map(Some)
                .map_err(|err| RepoError::mapping(column, format!("invalid decimal `{raw}`: {err}")))
        }
        ValueRef::Integer(value) => Ok(Some(Decimal::from(value))),
        ValueRef::Real(value) => Decimal::try_from(value)
            .map(Some)
            .map_err(|err| RepoError::mapping(column, format!("invalid decimal `{value}`: {err}"))),
        other => Err(unexpected(column, "decimal", other)),
    }
}

pub fn opt_datetime(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDateTime>> {
    match value_ref(row, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => parse_datetime(text(column, bytes)?)
            .map(Some)
            .ok_or_else(|| RepoError::mapping(column, "invalid datetime text")),
        other => Err(unexpected(column, "datetime text", other)),
    }
}

pub fn opt_date(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDate>> {
    match value_ref(row, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let raw = text(column, bytes)?.trim();
            NaiveDate::parse_from_str(raw, DATE_WRITE_FORMAT)
                .ok()
                .or_else(|| parse_datetime(raw).map(|value| value.date()))
                .map(Some)
                .ok_or_else(|| RepoError::mapping(column, format!("invalid date `{raw}`")))
        }
        other => Err(unexpected(column, "date text", other)),
    }
}

pub fn req_string(row: &Row<'_>, column: &str) -> RepoResult<String> {
    required(column, opt_string(row, column)?)
}

pub fn req_i64(row: &Row<'_>, column: &str) -> RepoResult<i64> {
    required(column, opt_i64(row, column)?)
}

pub fn req_bool(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    required(column, opt_bool(row, column)?)
}

pub fn req_datetime(row: &Row<'_>, column: &str) -> RepoResult<NaiveDateTime> {
    required(column, opt_datetime(row, column)?)
}

/// Accepts the write format, ISO `T` separators and bare dates (midnight).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_READ_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_WRITE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
