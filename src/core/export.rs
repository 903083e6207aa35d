//! Gradebook CSV export
//!
//! Layout: a two-column summary block, one blank line, then the detailed
//! grade table exactly as the report prints it (including the class average
//! and highest score rows).

use crate::core::error::{GradebookError, Result};
use crate::core::report::{detailed_grades_table, file_safe_id, ReportContext};
use std::fs;
use std::path::Path;

/// File name of a course's CSV export
#[must_use]
pub fn export_filename(course_id: &str) -> String {
    format!("gradebook-course-{}.csv", file_safe_id(course_id))
}

/// Render the CSV export to a string
///
/// # Errors
/// Returns an error if a record cannot be serialized
pub fn render_gradebook_csv(ctx: &ReportContext) -> Result<String> {
    let mut out = Vec::new();

    {
        let mut writer = csv::Writer::from_writer(&mut out);
        writer.write_record(["Course ID", ctx.course_id])?;
        writer.write_record(["Number of Students", &ctx.student_count().to_string()])?;
        writer.write_record(["Class Average", &format!("{:.2}%", ctx.course.class_average)])?;
        writer.write_record(["Gradable Items", &ctx.activity_count().to_string()])?;
        writer.flush().map_err(|e| GradebookError::Render(e.to_string()))?;
    }

    out.push(b'\n');

    {
        let table = detailed_grades_table(ctx);
        let mut writer = csv::Writer::from_writer(&mut out);
        writer.write_record(table.header.iter().map(|h| h.replace('\n', " ")))?;
        for row in &table.rows {
            writer.write_record(&row.cells)?;
        }
        writer.flush().map_err(|e| GradebookError::Render(e.to_string()))?;
    }

    String::from_utf8(out).map_err(|e| GradebookError::Render(e.to_string()))
}

/// Write the CSV export to `path`, creating parent directories
///
/// # Errors
/// Returns an error if the CSV cannot be rendered or the file cannot be written
pub fn export_gradebook_csv(ctx: &ReportContext, path: &Path) -> Result<()> {
    let content = render_gradebook_csv(ctx)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GradebookError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| GradebookError::io(path, e))?;
    crate::info!("Exported gradebook for course {} to {}", ctx.course_id, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::analyze;
    use crate::core::models::{activity_columns, ActivityGrade, StudentGradebook};

    #[test]
    fn test_summary_then_blank_line_then_table() {
        let students = vec![StudentGradebook::new(
            1,
            "Lovelace, Ada",
            vec![ActivityGrade::new(10, "Quiz 1", 10.0, Some(9.0))],
        )];
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let ctx = ReportContext::new("5", &analytics.students, &columns, &analytics.activity_stats, &course);

        let csv = render_gradebook_csv(&ctx).unwrap();
        let expected = "Course ID,5\n\
            Number of Students,1\n\
            Class Average,90.00%\n\
            Gradable Items,1\n\
            \n\
            Student Name,Quiz 1 ( / 10 ),Total Score,Average (%)\n\
            \"Lovelace, Ada\",9,9 / 10,90.00\n\
            Class Average,9.0,,\n\
            Highest Score,9,,\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("42"), "gradebook-course-42.csv");
        assert_eq!(export_filename("../x"), "gradebook-course-.._x.csv");
    }
}
