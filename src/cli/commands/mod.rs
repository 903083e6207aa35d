//! CLI command handlers for `gradebook`.
//!
//! Each command is implemented in its own submodule.

pub mod activities;
pub mod analyze;
pub mod config;
pub mod export;
pub mod report;
pub mod source;
