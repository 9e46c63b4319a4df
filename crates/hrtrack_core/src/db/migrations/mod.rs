//! Recruitment schema migrations.
//!
//! - v1 `0001_init.sql`: the thirteen entity tables (`Position` through
//!   `Headcount`) with integer keys (`CampaignID` for campaigns, `{Table}ID`
//!   elsewhere) and foreign keys. `Application` has no
//!   uniqueness on (candidate, job posting); audit rows in
//!   `ApplicationStatus` do not cascade with their application.
//! - v2 `0002_lookup_indexes.sql`: unique employee code, username,
//!   campaign/posting pair and headcount (department, position, year) key,
//!   plus lookup indexes for the repository finders.
//!
//! The applied version lives in `PRAGMA user_version`; pending steps run in
//! one transaction and a database newer than [`latest_version`] is refused.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_lookup_indexes.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
