//! Persisted audit entities.

mod log_entry;

pub use log_entry::LogEntry;
