//! SQLite connection management, schema introspection and raw query execution.
//!
//! A single [`Database`] owns the connection. Schema descriptions honour the
//! configured table scope; statement execution is never scope-restricted.

pub mod db;
pub mod executor;
pub mod schema;

pub use db::Database;
