//! SQLite backend for the recent-locations store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The capacity bound is enforced
//! in SQL: every insert is followed by a trim that deletes all rows outside
//! the newest seven by timestamp.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteLocationStore;
