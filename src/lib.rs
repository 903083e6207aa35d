//! Gradebook analytics and paginated report export
//!
//! Fetches a course's gradebook from the LMS, derives per-student totals,
//! per-activity statistics and the class grade distribution, and exports the
//! result as a paginated report (Markdown, HTML or PDF) or a CSV file.

pub mod core;
pub mod logger;

pub use core::{analytics, config, error, export, fetch, models, report};
