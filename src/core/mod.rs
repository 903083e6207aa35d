//! Core gradebook functionality shared by the library and the CLI

pub mod analytics;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod models;
pub mod report;

/// Returns the current version of the crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
