//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Word and explanation persistence
//! - Review history and per-word aggregates
//! - Atomic (delete-then-insert) review queue replacement
//! - The statistics snapshot query feeding the priority scorer

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{Result, Storage, StorageError};
