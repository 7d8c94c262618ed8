//! Storage backend implementation.
//!
//! This module provides the concrete implementation of the repository traits
//! defined in `ovenlovin_core::storage`, backed by SQLite via
//! `rusqlite`/`tokio-rusqlite`.

pub mod sqlite;

pub use sqlite::SqliteRepository;
