//! Report generation for course gradebooks
//!
//! The gradebook report is laid out once as a [`PagedDocument`] and then
//! rendered to Markdown, HTML or PDF. Nothing is written to disk until the
//! whole document has been assembled and rendered.

pub mod chart;
pub mod document;
pub mod formats;
pub mod gradebook;

use crate::core::analytics::{ActivityStats, ActivityStatsById, CourseAnalytics, StudentAnalytics};
use crate::core::error::{GradebookError, Result};
use crate::core::models::{ActivityColumn, ActivityId};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

pub use chart::{ChartSurface, DistributionChart, CHART_TITLE, MAX_CHART_SIZE, MIN_CHART_SIZE};
pub use document::{Block, DocumentBuilder, HeadingLevel, Page, PagedDocument, Table, TableRow};
pub use formats::{HtmlReporter, MarkdownReporter, PdfReporter, ReportFormat};
pub use gradebook::{build_report, detailed_grades_table, REPORT_FOOTER, REPORT_TITLE};

/// Data context for report generation
///
/// Aggregates everything the report and the CSV export read, so both see
/// the same numbers.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Course being reported
    pub course_id: &'a str,
    /// Students with their totals and percentages
    pub students: &'a [StudentAnalytics],
    /// Gradable items in column order
    pub columns: &'a [ActivityColumn],
    /// Class statistics per activity
    pub activity_stats: &'a ActivityStatsById,
    /// Course-level aggregates
    pub course: &'a CourseAnalytics,
    /// Timestamp printed in the title block
    pub generated_at: DateTime<Local>,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context stamped with the current time
    #[must_use]
    pub fn new(
        course_id: &'a str,
        students: &'a [StudentAnalytics],
        columns: &'a [ActivityColumn],
        activity_stats: &'a ActivityStatsById,
        course: &'a CourseAnalytics,
    ) -> Self {
        Self {
            course_id,
            students,
            columns,
            activity_stats,
            course,
            generated_at: Local::now(),
        }
    }

    /// Override the generation timestamp
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Statistics for one activity, if computed
    #[must_use]
    pub fn stats_for(&self, activity_id: ActivityId) -> Option<&ActivityStats> {
        self.activity_stats.get(&activity_id)
    }

    /// Number of students
    #[must_use]
    pub const fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Number of gradable items
    #[must_use]
    pub const fn activity_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether there is anything to report
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.students.is_empty() || self.columns.is_empty()
    }
}

/// Trait for report renderers
pub trait ReportGenerator {
    /// Render a laid-out document and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, doc: &PagedDocument, output_path: &Path) -> Result<()>;

    /// Render a laid-out document to text
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, doc: &PagedDocument) -> Result<String>;
}

/// Course id reduced to characters safe inside a single file name
///
/// Path separators and anything outside `[A-Za-z0-9._-]` become `_`, so the
/// generated name can never leave the output directory.
#[must_use]
pub fn file_safe_id(course_id: &str) -> String {
    course_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of a course report, e.g. `gradebook-report-course-42.pdf`
#[must_use]
pub fn report_filename(course_id: &str, format: ReportFormat) -> String {
    format!(
        "gradebook-report-course-{}.{}",
        file_safe_id(course_id),
        format.extension()
    )
}

/// Options for [`export_report`]
#[derive(Debug, Clone)]
pub struct ExportOptions<'a> {
    /// Output format
    pub format: ReportFormat,
    /// Directory the report is saved in
    pub output_dir: &'a Path,
    /// Chrome/Chromium executable for PDF output; auto-detected when `None`
    pub pdf_converter: Option<&'a str>,
}

/// Lay out, render and save a course report
///
/// Returns the path of the written file.
///
/// # Errors
/// Returns an error if the output directory cannot be created or the
/// rendering/conversion fails. A missing chart is not an error.
pub fn export_report(
    ctx: &ReportContext,
    chart: Option<&dyn ChartSurface>,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let doc = build_report(ctx, chart);
    crate::debug!(
        "Report for course {} laid out on {} pages",
        ctx.course_id,
        doc.page_count()
    );

    fs::create_dir_all(options.output_dir)
        .map_err(|e| GradebookError::io(options.output_dir, e))?;
    let output_path = options
        .output_dir
        .join(report_filename(ctx.course_id, options.format));

    match options.format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(&doc, &output_path)?,
        ReportFormat::Html => HtmlReporter::new().generate(&doc, &output_path)?,
        ReportFormat::Pdf => {
            let reporter = options
                .pdf_converter
                .map_or_else(PdfReporter::new, PdfReporter::with_converter);
            reporter.generate(&doc, &output_path)?;
        }
    }

    crate::info!("Saved {} report to {}", options.format, output_path.display());
    Ok(output_path)
}
