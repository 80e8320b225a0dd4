//! Entry store: time-entry rows and their lifecycle.

use crate::db::EntryRow;
use crate::error::{Error, Result};
use chrono::Local;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A recorded time-tracking session.
///
/// Immutable once created except for the description, which carries
/// `last_modified` along with it. Duration is an opaque formatted string
/// ("HH:MM:SS" by convention); formatting is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub duration: String,
    pub description: String,
    pub date_created: String,
    pub last_modified: String,
}

impl Entry {
    /// Convert an EntryRow to an Entry.
    pub fn from_row(row: EntryRow) -> Self {
        Self {
            id: row.id,
            duration: row.duration,
            description: row.description,
            date_created: row.date_created,
            last_modified: row.last_modified,
        }
    }
}

/// Storage timestamp: local time, second precision.
fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Insert a new time entry and return its id.
///
/// Sets `date_created = last_modified = now`. Does not touch any filter;
/// associating the entry is the session facade's job, inside the same
/// transaction as this insert.
pub fn save_entry(conn: &Connection, duration: &str, description: &str) -> Result<i64> {
    let timestamp = timestamp_now();
    conn.execute(
        "INSERT INTO time_entries (duration, description, date_created, last_modified)
         VALUES (?, ?, ?, ?)",
        rusqlite::params!(duration, description, timestamp, timestamp),
    )?;
    let id = conn.last_insert_rowid();
    info!(id, duration, "entry saved");
    Ok(id)
}

/// Get the entries linked to a filter, newest first (descending by id).
///
/// An unknown filter name is not an error: it yields an empty list, same
/// as a filter with no entries.
pub fn get_entries_for_filter(conn: &Connection, filter_name: &str) -> Result<Vec<Entry>> {
    let mut stmt = conn.prepare(
        "SELECT te.id, te.duration, te.description, te.date_created, te.last_modified
         FROM time_entries te
         JOIN filter_entries fe ON te.id = fe.entry_id
         JOIN filters f ON f.id = fe.filter_id
         WHERE f.name = ?
         ORDER BY te.id DESC",
    )?;
    let rows = stmt
        .query_map([filter_name], EntryRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows.into_iter().map(Entry::from_row).collect())
}

/// Update an entry's description and refresh `last_modified`.
///
/// An id that matches no row is [`Error::EntryNotFound`], not a silent
/// success.
pub fn update_description(conn: &Connection, entry_id: i64, new_description: &str) -> Result<()> {
    let updated = conn.execute(
        "UPDATE time_entries SET description = ?, last_modified = ? WHERE id = ?",
        rusqlite::params!(new_description, timestamp_now(), entry_id),
    )?;
    if updated == 0 {
        warn!(entry_id, "update matched no entry");
        return Err(Error::EntryNotFound(entry_id));
    }
    Ok(())
}

/// Delete a time entry. Same policy as updates: no matching row is
/// [`Error::EntryNotFound`].
pub fn delete_entry(conn: &Connection, entry_id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM time_entries WHERE id = ?", [entry_id])?;
    if deleted == 0 {
        return Err(Error::EntryNotFound(entry_id));
    }
    info!(entry_id, "entry deleted");
    Ok(())
}
