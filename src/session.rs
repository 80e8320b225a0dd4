//! Session facade - the operations the UI layer calls.
//!
//! Owns the database connection and composes the stores. The multi-step
//! sequences (entry save, filter assignment) run inside a single
//! transaction so they are visible all-or-nothing.

use crate::db::{Connection, DbPath, Schema};
use crate::error::{Error, Result};
use crate::store::{entry, filter, user, Entry, User};
use std::path::Path;

/// Session over the stopwatch database.
///
/// Every operation takes `&mut self`, so in-process callers serialize at
/// the handle; SQLite's own locking covers the file. No operation holds a
/// transaction beyond its own call.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Open a session against the database at the given path, creating and
    /// verifying the schema. A schema failure here is fatal: no session is
    /// handed out over a half-initialized store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        Schema::init(&mut conn)?;
        Ok(Self { conn })
    }

    /// Open a session against the default stopwatch.db file.
    pub fn open_default() -> Result<Self> {
        Self::open(DbPath::default_path().as_path())
    }

    /// Open an in-memory session for testing.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Schema::init(&mut conn)?;
        Ok(Self { conn })
    }

    // --- User operations ---

    /// Register a new account and return its id.
    pub fn register_user(&mut self, username: &str, password: &str) -> Result<i64> {
        user::register_user(self.conn.as_conn(), username, password)
    }

    /// Verify credentials.
    pub fn validate_user(&mut self, username: &str, password: &str) -> Result<bool> {
        user::validate_user(self.conn.as_conn(), username, password)
    }

    /// Look up a user by username.
    pub fn get_user(&mut self, username: &str) -> Result<Option<User>> {
        user::get_user(self.conn.as_conn(), username)
    }

    /// Look up a user id by username.
    pub fn get_user_id(&mut self, username: &str) -> Result<Option<i64>> {
        user::get_user_id(self.conn.as_conn(), username)
    }

    /// Create the filter if missing and link it to the user, atomically.
    pub fn assign_filter_to_user(&mut self, user_id: i64, filter_name: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let filter_id = filter::get_or_create(&tx, filter_name)?;
        user::link_user_to_filter(&tx, user_id, filter_id)?;
        tx.commit()?;
        Ok(())
    }

    // --- Filter operations ---

    /// Create a filter. True iff it was newly created; false means it
    /// already existed. Both mean the filter exists now.
    pub fn create_filter(&mut self, name: &str) -> Result<bool> {
        filter::create_filter(self.conn.as_conn(), name)
    }

    /// Filter names associated with a user, ascending by name.
    pub fn filters_for_user(&mut self, user_id: i64) -> Result<Vec<String>> {
        filter::get_filters_for_user(self.conn.as_conn(), user_id)
    }

    /// Delete a filter and, by cascade, its association rows. The entries
    /// that were linked to it are kept.
    pub fn delete_filter(&mut self, filter_name: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        let filter_id = filter::get_filter_id(&tx, filter_name)?
            .ok_or_else(|| Error::FilterNotFound(filter_name.to_string()))?;
        filter::delete_filter(&tx, filter_id)?;
        tx.commit()?;
        Ok(())
    }

    // --- Time entry operations ---

    /// Save a time entry under the named filter and return the entry id.
    ///
    /// Resolve, insert, and link run in one transaction: an unresolved
    /// filter name fails fast before anything is written, and a failure in
    /// the link step rolls the insert back. An entry can never persist
    /// unlinked to its filter.
    pub fn save_entry(
        &mut self,
        filter_name: &str,
        duration: &str,
        description: &str,
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let filter_id = filter::get_filter_id(&tx, filter_name)?
            .ok_or_else(|| Error::FilterNotFound(filter_name.to_string()))?;
        let entry_id = entry::save_entry(&tx, duration, description)?;
        filter::link_filter_to_entry(&tx, filter_id, entry_id)?;
        tx.commit()?;
        Ok(entry_id)
    }

    /// Entries linked to the named filter, newest first. Empty for an
    /// unknown filter.
    pub fn entries_for_filter(&mut self, filter_name: &str) -> Result<Vec<Entry>> {
        entry::get_entries_for_filter(self.conn.as_conn(), filter_name)
    }

    /// Update an entry's description, refreshing its `last_modified`.
    pub fn update_entry_description(
        &mut self,
        entry_id: i64,
        new_description: &str,
    ) -> Result<()> {
        entry::update_description(self.conn.as_conn(), entry_id, new_description)
    }

    /// Delete a time entry.
    pub fn delete_entry(&mut self, entry_id: i64) -> Result<()> {
        entry::delete_entry(self.conn.as_conn(), entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_session() -> Session {
        Session::open_in_memory().unwrap()
    }

    fn entry_count(session: &Session) -> i64 {
        session
            .conn
            .as_conn()
            .query_row("SELECT COUNT(*) FROM time_entries", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_open_on_disk_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stopwatch.db");

        {
            let mut session = Session::open(&path).unwrap();
            session.register_user("alice", "secret").unwrap();
        }

        // Second start against the same file sees the persisted user
        let mut session = Session::open(&path).unwrap();
        assert!(session.validate_user("alice", "secret").unwrap());
    }

    #[test]
    fn test_save_entry_scenario() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();

        let id = session.save_entry("Work", "00:15:00", "standup").unwrap();

        let entries = session.entries_for_filter("Work").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].duration, "00:15:00");
        assert_eq!(entries[0].description, "standup");

        assert!(session.entries_for_filter("Home").unwrap().is_empty());
    }

    #[test]
    fn test_save_entry_unknown_filter_writes_nothing() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();
        session.save_entry("Work", "00:15:00", "standup").unwrap();

        let before = entry_count(&session);
        let result = session.save_entry("Home", "01:00:00", "gardening");
        assert!(matches!(result, Err(Error::FilterNotFound(name)) if name == "Home"));

        // The failed save must not leave an orphaned entry behind
        assert_eq!(entry_count(&session), before);
    }

    #[test]
    fn test_save_entry_empty_description() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();

        session.save_entry("Work", "00:05:00", "").unwrap();
        let entries = session.entries_for_filter("Work").unwrap();
        assert_eq!(entries[0].description, "");
    }

    #[test]
    fn test_assign_filter_to_user() {
        let mut session = setup_session();
        let user_id = session.register_user("alice", "secret").unwrap();

        session.assign_filter_to_user(user_id, "Work").unwrap();
        session.assign_filter_to_user(user_id, "Home").unwrap();
        // Re-assigning an existing filter is a no-op
        session.assign_filter_to_user(user_id, "Work").unwrap();

        let filters = session.filters_for_user(user_id).unwrap();
        assert_eq!(filters, vec!["Home", "Work"]);
    }

    #[test]
    fn test_assign_filter_unknown_user_fails() {
        let mut session = setup_session();

        let result = session.assign_filter_to_user(999, "Work");
        assert!(matches!(result, Err(Error::Db(_))));

        // The filter created inside the failed transaction must not persist
        let count: i64 = session
            .conn
            .as_conn()
            .query_row("SELECT COUNT(*) FROM filters", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_update_description_bumps_last_modified() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();
        let id = session.save_entry("Work", "00:15:00", "standup").unwrap();

        let before = session.entries_for_filter("Work").unwrap()[0].clone();
        session.update_entry_description(id, "retro").unwrap();
        let after = session.entries_for_filter("Work").unwrap()[0].clone();

        assert_eq!(after.description, "retro");
        assert!(after.last_modified >= before.last_modified);
        assert!(after.last_modified >= after.date_created);
    }

    #[test]
    fn test_delete_entry() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();
        let id = session.save_entry("Work", "00:15:00", "standup").unwrap();

        session.delete_entry(id).unwrap();
        assert!(session.entries_for_filter("Work").unwrap().is_empty());

        let result = session.delete_entry(id);
        assert!(matches!(result, Err(Error::EntryNotFound(_))));
    }

    #[test]
    fn test_delete_filter_keeps_entries() {
        let mut session = setup_session();
        session.create_filter("Work").unwrap();
        session.save_entry("Work", "00:15:00", "standup").unwrap();

        session.delete_filter("Work").unwrap();

        assert!(session.entries_for_filter("Work").unwrap().is_empty());
        assert_eq!(entry_count(&session), 1);

        let result = session.delete_filter("Work");
        assert!(matches!(result, Err(Error::FilterNotFound(_))));
    }

    #[test]
    fn test_validate_user_lifecycle() {
        let mut session = setup_session();

        assert!(!session.validate_user("bob", "secret").unwrap());
        session.register_user("bob", "secret").unwrap();
        assert!(session.validate_user("bob", "secret").unwrap());
        assert!(!session.validate_user("bob", "wrong").unwrap());
    }

    #[test]
    fn test_get_user_pass_through() {
        let mut session = setup_session();
        let id = session.register_user("alice", "secret").unwrap();

        let user = session.get_user("alice").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(session.get_user_id("alice").unwrap(), Some(id));
        assert!(session.get_user("nobody").unwrap().is_none());
    }
}
