//! Error types for the punchcard persistence layer.

/// Result type alias for punchcard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the punchcard persistence layer.
///
/// Expected misses (`*NotFound`, `UserExists`) are distinct variants so
/// callers can branch on them; anything the storage engine reports is
/// wrapped in [`Error::Db`] and treated as a real failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// No user row matched the given id.
    #[error("User #{0} not found")]
    UserNotFound(i64),

    /// Registration attempted with a username that is already taken.
    #[error("Username '{0}' is already registered")]
    UserExists(String),

    /// No filter row matched the given name.
    #[error("Filter '{0}' not found")]
    FilterNotFound(String),

    /// No entry row matched the given id.
    #[error("Entry #{0} not found")]
    EntryNotFound(i64),

    /// Username must be non-empty.
    #[error("Username must not be empty")]
    EmptyUsername,

    /// Filter name must be non-empty.
    #[error("Filter name must not be empty")]
    EmptyFilterName,

    /// The store layer disagrees with itself, e.g. a filter cannot be
    /// resolved immediately after it was created.
    #[error("Store inconsistency: {0}")]
    Inconsistent(String),
}
