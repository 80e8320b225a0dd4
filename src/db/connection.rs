//! Database connection management.

use crate::error::{Error, Result};
use rusqlite::{Connection as SqliteConnection, Transaction};
use std::path::{Path, PathBuf};

/// Path to the stopwatch database file.
#[derive(Debug, Clone)]
pub struct DbPath {
    path: PathBuf,
}

impl DbPath {
    /// Create a new DbPath with the default filename "stopwatch.db".
    pub fn default_path() -> Self {
        Self {
            path: PathBuf::from("stopwatch.db"),
        }
    }

    /// Create a DbPath from a string path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path as a reference.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Check if the database file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for DbPath {
    fn default() -> Self {
        Self::default_path()
    }
}

/// Database connection wrapper.
///
/// Referential-integrity enforcement is a per-connection setting in SQLite,
/// so every constructor turns `foreign_keys` on before handing the
/// connection out.
pub struct Connection {
    conn: SqliteConnection,
}

impl Connection {
    /// Open a connection to the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = SqliteConnection::open(path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self { conn })
    }

    /// Open a connection to the default stopwatch.db file.
    pub fn open_default() -> Result<Self> {
        Self::open(DbPath::default_path().as_path())
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self { conn })
    }

    /// Begin a new transaction.
    ///
    /// Dropping the transaction without committing rolls it back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction().map_err(Error::from)
    }

    /// Get a reference to the underlying SqliteConnection.
    pub fn as_conn(&self) -> &SqliteConnection {
        &self.conn
    }

    /// Check if a table exists.
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?",
            [table_name],
            |_| Ok(true),
        );
        match exists {
            Ok(true) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(Error::from(e)),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::Schema;

    #[test]
    fn test_db_path_default() {
        let path = DbPath::default_path();
        assert_eq!(path.as_path(), Path::new("stopwatch.db"));
    }

    #[test]
    fn test_db_path_new() {
        let path = DbPath::new("custom.db");
        assert_eq!(path.as_path(), Path::new("custom.db"));
    }

    #[test]
    fn test_db_path_exists() {
        let path = DbPath::new("nonexistent.db");
        assert!(!path.exists());

        let temp = tempfile::NamedTempFile::new().unwrap();
        let existing = DbPath::new(temp.path());
        assert!(existing.exists());
    }

    #[test]
    fn test_connection_open_in_memory() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();
        assert!(conn.table_exists("users").unwrap());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        let fk_status: i64 = conn
            .as_conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_status, 1);
    }

    #[test]
    fn test_transaction_commit() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        {
            let tx = conn.transaction().unwrap();
            tx.execute(
                "INSERT INTO filters (name) VALUES (?)",
                rusqlite::params!("Work"),
            )
            .unwrap();
            tx.commit().unwrap();
        }

        let count: i64 = conn
            .as_conn()
            .query_row("SELECT COUNT(*) FROM filters", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_transaction_rollback() {
        let mut conn = Connection::open_in_memory().unwrap();
        Schema::init(&mut conn).unwrap();

        {
            let tx = conn.transaction().unwrap();
            tx.execute(
                "INSERT INTO filters (name) VALUES (?)",
                rusqlite::params!("Work"),
            )
            .unwrap();
            drop(tx); // Rollback by dropping
        }

        let count: i64 = conn
            .as_conn()
            .query_row("SELECT COUNT(*) FROM filters", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
