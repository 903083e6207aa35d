//! Data models for course gradebooks

pub mod activity;
pub mod gradebook;

pub use activity::Activity;
pub use gradebook::{
    activity_columns, ActivityColumn, ActivityGrade, ActivityId, CourseGradebook, PersonId, StudentGradebook,
};
