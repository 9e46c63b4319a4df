//! User account persistence.
//!
//! Credentials arrive already hashed and salted. This module stores and
//! returns them verbatim and never hashes, verifies or interprets them.

use super::base::{
    self, bool_to_int, fmt_datetime, now, opt_datetime, req_bool, req_i64, req_string,
};
use super::{RepoResult, Repository};
use crate::db::Store;
use crate::model::people::{User, UserNavigation};
use crate::model::{Entity, EntityId};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};

const USER_COLUMNS: &str = "
    u.UserID AS UserID,
    u.EmployeeID AS EmployeeID,
    u.Username AS Username,
    u.PasswordHash AS PasswordHash,
    u.Salt AS Salt,
    u.Role AS Role,
    u.IsActive AS IsActive,
    u.LastLoginDate AS LastLoginDate,
    u.CreatedDate AS CreatedDate,
    u.UpdatedDate AS UpdatedDate";

fn select_sql(include_navigation: bool) -> String {
    if include_navigation {
        format!(
            "SELECT {USER_COLUMNS},
                e.FullName AS EmployeeName,
                e.EmployeeCode AS EmployeeCode
             FROM User u
             INNER JOIN Employee e ON e.EmployeeID = u.EmployeeID"
        )
    } else {
        format!("SELECT {USER_COLUMNS} FROM User u")
    }
}

pub trait UserRepository: Repository<Entity = User> {
    /// Case-insensitive username lookup used by the login collaborator.
    fn get_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn username_exists(&self, username: &str) -> RepoResult<bool>;
    fn get_by_employee(&self, employee_id: EntityId) -> RepoResult<Option<User>>;
    /// Case-insensitive role match.
    fn get_by_role(&self, role: &str) -> RepoResult<Vec<User>>;
    /// Replaces the stored hash and salt with pre-computed values.
    fn update_credentials(&self, id: EntityId, password_hash: &str, salt: &str)
        -> RepoResult<bool>;
    fn update_last_login(&self, id: EntityId, at: NaiveDateTime) -> RepoResult<bool>;
}

pub struct SqliteUserRepository {
    store: Store,
}

impl SqliteUserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Repository for SqliteUserRepository {
    type Entity = User;

    fn store(&self) -> &Store {
        &self.store
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<User>> {
        base::run(&self.store, User::TABLE, "get_by_id", |conn| {
            base::query_first(
                conn,
                &format!("{} WHERE u.UserID = ?1;", select_sql(true)),
                [id],
                |row| map_user(row, true),
            )
        })
    }

    fn get_all(&self) -> RepoResult<Vec<User>> {
        base::run(&self.store, User::TABLE, "get_all", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} ORDER BY u.Username COLLATE NOCASE ASC, u.UserID ASC;",
                    select_sql(true)
                ),
                [],
                |row| map_user(row, true),
            )
        })
    }

    fn add(&self, user: &User) -> RepoResult<EntityId> {
        base::run(&self.store, User::TABLE, "add", |conn| {
            base::insert(
                conn,
                "INSERT INTO User (
                    EmployeeID,
                    Username,
                    PasswordHash,
                    Salt,
                    Role,
                    IsActive,
                    LastLoginDate,
                    CreatedDate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    user.employee_id,
                    user.username.trim(),
                    user.password_hash.as_str(),
                    user.salt.as_str(),
                    user.role.as_str(),
                    bool_to_int(user.is_active),
                    user.last_login_date.map(fmt_datetime),
                    fmt_datetime(now()),
                ],
            )
        })
    }

    /// Profile fields only; credentials change through `update_credentials`.
    fn update(&self, user: &User) -> RepoResult<bool> {
        base::run(&self.store, User::TABLE, "update", |conn| {
            base::execute_affected(
                conn,
                "UPDATE User
                 SET
                    EmployeeID = ?2,
                    Username = ?3,
                    Role = ?4,
                    IsActive = ?5,
                    UpdatedDate = ?6
                 WHERE UserID = ?1;",
                params![
                    user.id,
                    user.employee_id,
                    user.username.trim(),
                    user.role.as_str(),
                    bool_to_int(user.is_active),
                    fmt_datetime(now()),
                ],
            )
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn get_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        base::run(&self.store, User::TABLE, "get_by_username", |conn| {
            base::query_first(
                conn,
                &format!(
                    "{} WHERE u.Username = ?1 COLLATE NOCASE;",
                    select_sql(false)
                ),
                [username.trim()],
                |row| map_user(row, false),
            )
        })
    }

    fn username_exists(&self, username: &str) -> RepoResult<bool> {
        base::run(&self.store, User::TABLE, "username_exists", |conn| {
            let found = base::query_scalar(
                conn,
                "SELECT EXISTS(SELECT 1 FROM User WHERE Username = ?1 COLLATE NOCASE);",
                [username.trim()],
            )?;
            Ok(found == 1)
        })
    }

    fn get_by_employee(&self, employee_id: EntityId) -> RepoResult<Option<User>> {
        base::run(&self.store, User::TABLE, "get_by_employee", |conn| {
            base::query_first(
                conn,
                &format!(
                    "{} WHERE u.EmployeeID = ?1 ORDER BY u.UserID ASC LIMIT 1;",
                    select_sql(true)
                ),
                [employee_id],
                |row| map_user(row, true),
            )
        })
    }

    fn get_by_role(&self, role: &str) -> RepoResult<Vec<User>> {
        base::run(&self.store, User::TABLE, "get_by_role", |conn| {
            base::query_all(
                conn,
                &format!(
                    "{} WHERE u.Role = ?1 COLLATE NOCASE ORDER BY u.Username COLLATE NOCASE ASC;",
                    select_sql(false)
                ),
                [role.trim()],
                |row| map_user(row, false),
            )
        })
    }

    fn update_credentials(
        &self,
        id: EntityId,
        password_hash: &str,
        salt: &str,
    ) -> RepoResult<bool> {
        base::run(&self.store, User::TABLE, "update_credentials", |conn| {
            base::execute_affected(
                conn,
                "UPDATE User
                 SET PasswordHash = ?2, Salt = ?3, UpdatedDate = ?4
                 WHERE UserID = ?1;",
                params![id, password_hash, salt, fmt_datetime(now())],
            )
        })
    }

    fn update_last_login(&self, id: EntityId, at: NaiveDateTime) -> RepoResult<bool> {
        base::run(&self.store, User::TABLE, "update_last_login", |conn| {
            base::execute_affected(
                conn,
                "UPDATE User SET LastLoginDate = ?2 WHERE UserID = ?1;",
                params![id, fmt_datetime(at)],
            )
        })
    }
}

fn map_user(row: &Row<'_>, include_navigation: bool) -> RepoResult<User> {
    let navigation = if include_navigation {
        Some(UserNavigation {
            employee_name: req_string(row, "EmployeeName")?,
            employee_code: req_string(row, "EmployeeCode")?,
        })
    } else {
        None
    };

    Ok(User {
        id: req_i64(row, "UserID")?,
        employee_id: req_i64(row, "EmployeeID")?,
        username: req_string(row, "Username")?,
        password_hash: req_string(row, "PasswordHash")?,
        salt: req_string(row, "Salt")?,
        role: req_string(row, "Role")?,
        is_active: req_bool(row, "IsActive")?,
        last_login_date: opt_datetime(row, "LastLoginDate")?,
        created_date: opt_datetime(row, "CreatedDate")?,
        updated_date: opt_datetime(row, "UpdatedDate")?,
        navigation,
    })
}
