//! Store layer: user, filter, and entry operations.
//!
//! Each store is a set of plain functions over a SQLite connection so the
//! session facade can run them either standalone or inside a transaction
//! (`rusqlite::Transaction` derefs to `Connection`).

pub mod entry;
pub mod filter;
pub mod user;

pub use entry::Entry;
pub use user::User;
