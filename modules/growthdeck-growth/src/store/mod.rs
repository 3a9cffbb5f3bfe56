//! Persistence. One SQLite-backed store implements all three store traits.

pub mod sqlite;

pub use sqlite::SqliteStore;
