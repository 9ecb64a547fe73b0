//! Shared types for Shelf
//!
//! This crate provides:
//! - Debounce and shake-navigation configuration
//! - Reminder configuration
//! - TOML config file loading, validation and persistence
//! - Error types shared by the watcher and the CLI

pub mod config;
pub mod error;

// Re-exports
pub use config::{DebounceConfig, ReminderConfig, ShakeConfig, ShelfConfig};
pub use error::{ConfigError, DebounceError};
