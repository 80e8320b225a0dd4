//! User store: account creation, credential verification, lookup.

use crate::db::UserRow;
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A user account, without its stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl User {
    /// Convert a UserRow to a User.
    pub fn from_row(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

/// Register a new account and return its id.
///
/// The duplicate check runs before the insert so a taken username surfaces
/// as [`Error::UserExists`] rather than a raw constraint violation.
pub fn register_user(conn: &Connection, username: &str, password: &str) -> Result<i64> {
    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }
    if user_exists(conn, username)? {
        warn!(username, "registration rejected: username taken");
        return Err(Error::UserExists(username.to_string()));
    }

    conn.execute(
        "INSERT INTO users (username, password) VALUES (?, ?)",
        rusqlite::params!(username, password),
    )?;
    let id = conn.last_insert_rowid();
    info!(username, id, "user registered");
    Ok(id)
}

/// Check whether a username is already taken.
fn user_exists(conn: &Connection, username: &str) -> Result<bool> {
    let row: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )
        .optional()?;
    Ok(row.is_some())
}

/// Verify credentials: true only on exact match of both fields.
///
/// Passwords are stored as opaque values and compared verbatim; there is no
/// hashing, rate limiting, or lockout (accepted scope limitation of the
/// stopwatch application).
pub fn validate_user(conn: &Connection, username: &str, password: &str) -> Result<bool> {
    let row: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ? AND password = ?",
            rusqlite::params!(username, password),
            |row| row.get(0),
        )
        .optional()?;
    Ok(row.is_some())
}

/// Get a user by username.
pub fn get_user(conn: &Connection, username: &str) -> Result<Option<User>> {
    let row = conn
        .query_row(
            "SELECT id, username FROM users WHERE username = ?",
            [username],
            UserRow::from_row,
        )
        .optional()?;
    Ok(row.map(User::from_row))
}

/// Get a user id by username.
pub fn get_user_id(conn: &Connection, username: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Link a user to a filter. Returns true iff a new association row was
/// inserted; an already-linked pair is a no-op.
pub fn link_user_to_filter(conn: &Connection, user_id: i64, filter_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO user_filters (user_id, filter_id) VALUES (?, ?)",
        rusqlite::params!(user_id, filter_id),
    )?;
    Ok(inserted > 0)
}

/// Delete a user account. Administrative only: the session facade does not
/// expose this. The schema cascades the user's filter associations away.
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM users WHERE id = ?", [user_id])?;
    if deleted == 0 {
        return Err(Error::UserNotFound(user_id));
    }
    info!(user_id, "user deleted");
    Ok(())
}
