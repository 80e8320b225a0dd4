//! Database layer for the punchcard store.
//!
//! Handles SQLite connection setup, schema creation, and row types.

mod connection;
pub mod schema;

pub use connection::{Connection, DbPath};
pub use schema::{EntryRow, Schema, UserRow};
