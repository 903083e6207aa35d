//! Gradebook loading shared by the data commands
//!
//! `--input FILE` reads a saved payload; otherwise the configured service is
//! queried on a current-thread runtime.

use crate::args::SourceArgs;
use gradebook_analytics::analytics::{analyze, CourseAnalytics, GradebookAnalytics};
use gradebook_analytics::config::Config;
use gradebook_analytics::fetch::{load_course, CourseSelection, FetchState, FileGradeService, GradeService, HttpGradeService};
use gradebook_analytics::models::{ActivityColumn, CourseGradebook};
use gradebook_analytics::report::ReportContext;
use gradebook_analytics::{error, info};
use std::path::Path;

/// Message printed when a course has nothing to analyze
pub const EMPTY_COURSE_MESSAGE: &str = "No students or gradable items found for this course.";

/// A fetched gradebook with its analytics
pub struct AnalyzedCourse {
    /// Raw gradebook
    pub gradebook: CourseGradebook,
    /// Per-student and per-activity analytics
    pub analytics: GradebookAnalytics,
    /// Course-level aggregates
    pub course: CourseAnalytics,
    /// Activity columns in gradebook order
    pub columns: Vec<ActivityColumn>,
}

impl AnalyzedCourse {
    /// Run the aggregator over a gradebook
    pub fn new(gradebook: CourseGradebook) -> Self {
        let analytics = analyze(&gradebook.students);
        let course = analytics.course_analytics();
        let columns = gradebook.columns();
        Self {
            gradebook,
            analytics,
            course,
            columns,
        }
    }

    /// Whether there is nothing to analyze
    pub fn is_empty(&self) -> bool {
        self.gradebook.students.is_empty() || self.columns.is_empty()
    }

    /// Report context over this course
    pub fn context(&self) -> ReportContext<'_> {
        ReportContext::new(
            &self.gradebook.course_id,
            &self.analytics.students,
            &self.columns,
            &self.analytics.activity_stats,
            &self.course,
        )
    }
}

/// Build the grade service for a run
pub fn service(input: Option<&Path>, config: &Config) -> Result<Box<dyn GradeService + Sync>, String> {
    if let Some(path) = input {
        info!("Reading gradebook from {}", path.display());
        return Ok(Box::new(FileGradeService::new(path)));
    }

    if config.api.token.is_empty() {
        gradebook_analytics::warn!("No API token configured; requests are sent unauthenticated");
    }

    HttpGradeService::new(&config.api.endpoint, &config.api.token, config.api.timeout())
        .map(|s| Box::new(s) as Box<dyn GradeService + Sync>)
        .map_err(|e| format!("✗ {e}"))
}

/// Single-threaded runtime used to drive the service
pub fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("✗ Failed to start async runtime: {e}"))
}

/// Fetch a course's gradebook and run the analytics over it
pub fn load(source: &SourceArgs, config: &Config) -> Result<AnalyzedCourse, String> {
    let service = service(source.input.as_deref(), config)?;
    let runtime = runtime()?;

    let mut selection = CourseSelection::new();
    runtime.block_on(load_course(&mut selection, service.as_ref(), &source.course_id));

    match selection.take() {
        FetchState::Loaded { data, .. } => Ok(AnalyzedCourse::new(data)),
        FetchState::Failed { message, .. } => Err(format!("✗ {message}")),
        FetchState::Idle | FetchState::Pending { .. } => {
            error!("Gradebook fetch for course {} did not complete", source.course_id);
            Err(format!("✗ Gradebook for course {} was not loaded", source.course_id))
        }
    }
}
