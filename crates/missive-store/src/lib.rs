//! # missive-store
//!
//! Local message ledger backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle wrapping a
//! `rusqlite::Connection`, typed helpers over the persisted message rows,
//! the content-based dedup upsert used on the inbound write path, and the
//! muted-conversation preferences.

pub mod database;
pub mod dedup;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod preferences;

mod error;

pub use database::Database;
pub use dedup::{upsert, MessageLedger, SqliteLedger, UpsertOutcome};
pub use error::StoreError;
pub use models::*;
