//! Database schema and row types.

use crate::db::Connection as DbConnection;
use crate::error::Result;
use rusqlite::Row;

/// Schema version and management.
pub struct Schema;

impl Schema {
    /// Initialize the database schema.
    ///
    /// Creates the five tables if they are missing. Idempotent: safe to
    /// call on every process start. All DDL runs in a single transaction,
    /// so a failed statement leaves no half-initialized schema behind and
    /// the caller sees one error for the whole startup step.
    pub fn init(conn: &mut DbConnection) -> Result<()> {
        // journal_mode cannot be changed inside a transaction
        conn.as_conn()
            .pragma_update(None, "journal_mode", "WAL")?;

        let tx = conn.transaction()?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS filters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS time_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                duration TEXT NOT NULL,
                description TEXT NOT NULL,
                date_created TEXT NOT NULL,
                last_modified TEXT NOT NULL
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS user_filters (
                user_id INTEGER NOT NULL,
                filter_id INTEGER NOT NULL,
                PRIMARY KEY (user_id, filter_id),
                FOREIGN KEY (user_id) REFERENCES users(id)
                    ON DELETE CASCADE ON UPDATE CASCADE,
                FOREIGN KEY (filter_id) REFERENCES filters(id)
                    ON DELETE CASCADE ON UPDATE CASCADE
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS filter_entries (
                filter_id INTEGER NOT NULL,
                entry_id INTEGER NOT NULL,
                PRIMARY KEY (filter_id, entry_id),
                FOREIGN KEY (filter_id) REFERENCES filters(id)
                    ON DELETE CASCADE ON UPDATE CASCADE,
                FOREIGN KEY (entry_id) REFERENCES time_entries(id)
                    ON DELETE CASCADE ON UPDATE CASCADE
            )",
            [],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Check if the database schema is already initialized.
    pub fn is_initialized(conn: &DbConnection) -> bool {
        conn.table_exists("users").unwrap_or(false)
    }
}

/// Row representation of a user from the database.
///
/// Carries only the columns the stores expose; the stored password is
/// compared inside SQL and never materialized into a row type.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
}

impl UserRow {
    /// Create a UserRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
        })
    }
}

/// Row representation of a time entry from the database.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    pub duration: String,
    pub description: String,
    pub date_created: String,
    pub last_modified: String,
}

impl EntryRow {
    /// Create an EntryRow from a SQLite row.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            duration: row.get("duration")?,
            description: row.get("description")?,
            date_created: row.get("date_created")?,
            last_modified: row.get("last_modified")?,
        })
    }
}
