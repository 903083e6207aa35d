//! Export command handler

use super::source::{self, EMPTY_COURSE_MESSAGE};
use crate::args::SourceArgs;
use gradebook_analytics::config::Config;
use gradebook_analytics::error;
use gradebook_analytics::export::{export_filename, export_gradebook_csv};
use std::path::Path;

/// Run the export command
pub fn run(source: &SourceArgs, output: Option<&Path>, config: &Config) -> Result<(), String> {
    let course = source::load(source, config)?;
    if course.is_empty() {
        println!("{EMPTY_COURSE_MESSAGE}");
        return Ok(());
    }

    let path = output.map_or_else(
        || config.paths.exports_path().join(export_filename(&source.course_id)),
        Path::to_path_buf,
    );

    export_gradebook_csv(&course.context(), &path).map_err(|e| {
        error!("CSV export failed for course {}: {e}", source.course_id);
        format!("✗ Failed to export {}: {e}", path.display())
    })?;

    println!("✓ Gradebook exported: {}", path.display());
    Ok(())
}
