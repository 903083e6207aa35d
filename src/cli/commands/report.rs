//! Report command handler
//!
//! Fetches the gradebook, runs the analytics, renders the distribution chart
//! and writes the paginated report.

use super::source::{self, EMPTY_COURSE_MESSAGE};
use crate::args::SourceArgs;
use gradebook_analytics::config::Config;
use gradebook_analytics::report::{export_report, ChartSurface, DistributionChart, ExportOptions, ReportFormat};
use gradebook_analytics::{error, verbose};
use std::path::Path;

/// Options of one report run
pub struct ReportArgs<'a> {
    /// Course and data source
    pub source: &'a SourceArgs,
    /// Format from the command line, if any
    pub format: Option<&'a str>,
    /// Output directory from the command line, if any
    pub output: Option<&'a Path>,
    /// Skip the chart section
    pub no_chart: bool,
}

/// Resolve the report format: command line first, then config, then PDF
fn resolve_format(cli: Option<&str>, config: &Config) -> Result<ReportFormat, String> {
    let raw = cli
        .or_else(|| Some(config.report.format.as_str()).filter(|f| !f.is_empty()))
        .unwrap_or("pdf");
    raw.parse().map_err(|e| format!("✗ {e}"))
}

/// Run the report command
pub fn run(args: &ReportArgs, config: &Config) -> Result<(), String> {
    let format = resolve_format(args.format, config)?;
    let output_dir = args
        .output
        .map_or_else(|| config.paths.reports_path(), Path::to_path_buf);

    let course = source::load(args.source, config)?;
    if course.is_empty() {
        println!("{EMPTY_COURSE_MESSAGE}");
        return Ok(());
    }

    let chart = DistributionChart::new(
        course.course.grade_distribution.clone(),
        config.report.chart_width,
        config.report.chart_height,
    );
    let surface: Option<&dyn ChartSurface> = if args.no_chart { None } else { Some(&chart) };

    let converter = config.report.converter();
    let options = ExportOptions {
        format,
        output_dir: &output_dir,
        pdf_converter: converter.as_deref(),
    };

    let path = export_report(&course.context(), surface, &options).map_err(|e| {
        error!("Report generation failed for course {}: {e}", args.source.course_id);
        format!("✗ Failed to generate {format} report: {e}")
    })?;

    verbose!(
        "Course {}: {} students, {} activities",
        course.gradebook.course_id,
        course.analytics.students.len(),
        course.columns.len()
    );
    println!("✓ Report generated: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_format(None, &config).unwrap(), ReportFormat::Pdf);

        config.report.format = "html".to_string();
        assert_eq!(resolve_format(None, &config).unwrap(), ReportFormat::Html);
        assert_eq!(resolve_format(Some("md"), &config).unwrap(), ReportFormat::Markdown);
        assert!(resolve_format(Some("docx"), &config).is_err());
    }
}
