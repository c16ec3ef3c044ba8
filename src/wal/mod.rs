//! Write-Ahead Log Module
//!
//! Durability for the cache: every accepted write is appended and synced
//! before it is acknowledged, and the whole log is replayed on startup.

mod log;
mod record;

pub use log::WriteAheadLog;
pub use record::{WalRecord, FIELD_DELIMITER, RECORD_TERMINATOR};
