//! Filter store: named categories and their associations.

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

/// Create a filter if it does not exist yet.
///
/// Returns true iff a new row was inserted; false means the name was
/// already present. Either way the filter exists afterwards.
pub fn create_filter(conn: &Connection, name: &str) -> Result<bool> {
    if name.is_empty() {
        return Err(Error::EmptyFilterName);
    }
    let inserted = conn.execute("INSERT OR IGNORE INTO filters (name) VALUES (?)", [name])?;
    if inserted > 0 {
        info!(filter = name, "filter created");
    }
    Ok(inserted > 0)
}

/// Resolve a filter name to its id.
pub fn get_filter_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row("SELECT id FROM filters WHERE name = ?", [name], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

/// Create the filter if missing and return its id.
///
/// Resolution failing right after creation means the schema and the store
/// disagree; that is surfaced as [`Error::Inconsistent`] rather than a miss.
pub fn get_or_create(conn: &Connection, name: &str) -> Result<i64> {
    create_filter(conn, name)?;
    get_filter_id(conn, name)?
        .ok_or_else(|| Error::Inconsistent(format!("filter '{name}' unresolved after create")))
}

/// Get the filter names associated with a user, ascending by name.
pub fn get_filters_for_user(conn: &Connection, user_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT f.name FROM filters f
         JOIN user_filters uf ON f.id = uf.filter_id
         WHERE uf.user_id = ?
         ORDER BY f.name ASC",
    )?;
    let names = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Link a filter to an entry. Returns true iff a new association row was
/// inserted; an already-linked pair is a no-op.
pub fn link_filter_to_entry(conn: &Connection, filter_id: i64, entry_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO filter_entries (filter_id, entry_id) VALUES (?, ?)",
        rusqlite::params!(filter_id, entry_id),
    )?;
    Ok(inserted > 0)
}

/// Delete a filter by id.
///
/// The schema cascades its rows out of both association tables; time
/// entries themselves are kept.
pub fn delete_filter(conn: &Connection, filter_id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM filters WHERE id = ?", [filter_id])?;
    if deleted == 0 {
        warn!(filter_id, "delete matched no filter");
        return Err(Error::FilterNotFound(format!("#{filter_id}")));
    }
    info!(filter_id, "filter deleted");
    Ok(())
}
