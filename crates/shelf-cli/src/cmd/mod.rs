//! CLI command implementations

pub mod config;
pub mod listen;
pub mod remind;
