//! SQLite backend for the water billing engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
