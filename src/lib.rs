//! # punchcard - Time Tracker Persistence Layer
//!
//! Persistence and session layer for a stopwatch time tracker: user
//! accounts, named filters (categories/projects), and duration+description
//! time entries, stored in a single SQLite file.
//!
//! The UI layer talks to [`Session`] only; multi-step operations such as
//! saving an entry under a filter are one transaction each.

pub mod db;
pub mod error;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use session::Session;
pub use store::{Entry, User};

pub use db::Connection;
