//! Gradebook report layout
//!
//! Sections in order: title block, course overview, grade distribution table,
//! distribution chart, detailed grades (new page) and activity statistics
//! (new page). Every page is stamped with a `Page i of N` footer.

use super::chart::ChartSurface;
use super::document::{DocumentBuilder, HeadingLevel, PagedDocument, Table};
use super::ReportContext;

/// Report title
pub const REPORT_TITLE: &str = "Gradebook & Analytics Report";
/// Text following the page numbers in every footer
pub const REPORT_FOOTER: &str = "Generated from Gradebook System";

const NOT_AVAILABLE: &str = "N/A";
const UNGRADED: &str = "-";

/// Lay the full report out on pages
///
/// A missing or failing chart only drops the chart section.
#[must_use]
pub fn build_report(ctx: &ReportContext, chart: Option<&dyn ChartSurface>) -> PagedDocument {
    let mut doc = PagedDocument::new(REPORT_TITLE);

    add_title_block(&mut doc, ctx);
    add_overview(&mut doc, ctx);
    add_distribution(&mut doc, ctx);
    add_chart(&mut doc, chart);

    doc.new_page();
    doc.add_heading("Detailed Grades", HeadingLevel::Section);
    doc.add_table(detailed_grades_table(ctx));

    doc.new_page();
    doc.add_heading("Activity Statistics Summary", HeadingLevel::Section);
    doc.add_table(activity_statistics_table(ctx));

    doc.finalize(REPORT_FOOTER);
    doc
}

fn add_title_block<D: DocumentBuilder>(doc: &mut D, ctx: &ReportContext) {
    doc.add_heading(REPORT_TITLE, HeadingLevel::Title);
    doc.add_text(&format!("Course ID: {}", ctx.course_id));
    doc.add_text(&format!(
        "Generated on: {}",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
}

fn add_overview<D: DocumentBuilder>(doc: &mut D, ctx: &ReportContext) {
    doc.add_heading("Course Overview", HeadingLevel::Section);
    let mut table = Table::new(["Metric", "Value"]);
    table.push_row(vec![
        "Number of Students".to_string(),
        ctx.student_count().to_string(),
    ]);
    table.push_row(vec![
        "Class Average".to_string(),
        format!("{:.2}%", ctx.course.class_average),
    ]);
    table.push_row(vec![
        "Gradable Items".to_string(),
        ctx.activity_count().to_string(),
    ]);
    doc.add_table(table);
}

fn add_distribution<D: DocumentBuilder>(doc: &mut D, ctx: &ReportContext) {
    doc.add_heading("Grade Distribution", HeadingLevel::Section);
    let mut table = Table::new(["Grade Range", "Number of Students"]);
    for (label, count) in ctx.course.grade_distribution.iter() {
        table.push_row(vec![label.to_string(), count.to_string()]);
    }
    doc.add_table(table);
}

fn add_chart<D: DocumentBuilder>(doc: &mut D, chart: Option<&dyn ChartSurface>) {
    let Some(surface) = chart else {
        crate::warn!("Chart not available for export, skipping chart section");
        return;
    };
    let Some(png) = surface.capture_image() else {
        crate::warn!("Could not capture grade distribution chart, skipping chart section");
        return;
    };

    let (width, height) = surface.dimensions();
    doc.add_heading("Grade Distribution Chart", HeadingLevel::Section);
    doc.add_image(png, width, height);
}

/// Per-student grades plus the class average and highest score rows
///
/// Columns: Student Name, one per activity (title with a `( / max )`
/// subheading), Total Score, Average (%).
#[must_use]
pub fn detailed_grades_table(ctx: &ReportContext) -> Table {
    let mut header = Vec::with_capacity(ctx.columns.len() + 3);
    header.push("Student Name".to_string());
    header.extend(
        ctx.columns
            .iter()
            .map(|c| format!("{}\n( / {} )", c.title, c.max_marks)),
    );
    header.push("Total Score".to_string());
    header.push("Average (%)".to_string());
    let mut table = Table::new(header);

    for student in ctx.students {
        let mut cells = Vec::with_capacity(ctx.columns.len() + 3);
        cells.push(student.name().to_string());
        cells.extend(ctx.columns.iter().map(|c| {
            student
                .student
                .marks_for(c.activity_id)
                .map_or_else(|| UNGRADED.to_string(), |m| m.to_string())
        }));
        cells.push(format!(
            "{} / {}",
            student.total_marks, student.total_max_marks
        ));
        cells.push(format!("{:.2}", student.average_percentage));
        table.push_row(cells);
    }

    table.push_emphasized_row(summary_row(ctx, "Class Average", |s| {
        format!("{:.1}", s.average)
    }));
    table.push_emphasized_row(summary_row(ctx, "Highest Score", |s| s.high.to_string()));
    table
}

fn summary_row<F>(ctx: &ReportContext, label: &str, cell: F) -> Vec<String>
where
    F: Fn(&crate::core::analytics::ActivityStats) -> String,
{
    let mut cells = Vec::with_capacity(ctx.columns.len() + 3);
    cells.push(label.to_string());
    cells.extend(ctx.columns.iter().map(|c| {
        ctx.stats_for(c.activity_id)
            .map_or_else(|| NOT_AVAILABLE.to_string(), &cell)
    }));
    cells.push(String::new());
    cells.push(String::new());
    cells
}

fn activity_statistics_table(ctx: &ReportContext) -> Table {
    let mut table = Table::new([
        "Activity",
        "Max Marks",
        "Class Average",
        "Highest Score",
        "Lowest Score",
    ]);
    for column in ctx.columns {
        let stats = ctx.stats_for(column.activity_id);
        table.push_row(vec![
            column.title.clone(),
            column.max_marks.to_string(),
            stats.map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{:.1}", s.average)),
            stats.map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.high.to_string()),
            stats.map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.low.to_string()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::{analyze, ActivityStatsById};
    use crate::core::models::{activity_columns, ActivityGrade, StudentGradebook};
    use crate::core::report::document::Block;

    struct FailingSurface;

    impl ChartSurface for FailingSurface {
        fn capture_image(&self) -> Option<Vec<u8>> {
            None
        }

        fn dimensions(&self) -> (u32, u32) {
            (800, 400)
        }
    }

    struct FixedSurface;

    impl ChartSurface for FixedSurface {
        fn capture_image(&self) -> Option<Vec<u8>> {
            Some(vec![0x89, b'P', b'N', b'G'])
        }

        fn dimensions(&self) -> (u32, u32) {
            (800, 400)
        }
    }

    fn roster() -> Vec<StudentGradebook> {
        vec![
            StudentGradebook::new(
                1,
                "Ada",
                vec![
                    ActivityGrade::new(10, "Quiz 1", 10.0, Some(8.0)),
                    ActivityGrade::new(11, "Midterm", 50.0, Some(45.0)),
                ],
            ),
            StudentGradebook::new(
                2,
                "Grace",
                vec![
                    ActivityGrade::new(10, "Quiz 1", 10.0, None),
                    ActivityGrade::new(11, "Midterm", 50.0, Some(30.0)),
                ],
            ),
        ]
    }

    fn headings(doc: &PagedDocument) -> Vec<(usize, String)> {
        doc.pages()
            .iter()
            .enumerate()
            .flat_map(|(i, page)| {
                page.blocks.iter().filter_map(move |b| match b {
                    Block::Heading { text, .. } => Some((i, text.clone())),
                    _ => None,
                })
            })
            .collect()
    }

    #[test]
    fn test_detailed_table_shape_and_cells() {
        let students = roster();
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let ctx = ReportContext::new("7", &analytics.students, &columns, &analytics.activity_stats, &course);

        let table = detailed_grades_table(&ctx);
        assert_eq!(table.column_count(), 1 + 2 + 2);
        assert_eq!(table.rows.len(), 2 + 2);
        assert_eq!(table.header[1], "Quiz 1\n( / 10 )");

        assert_eq!(table.rows[0].cells, vec!["Ada", "8", "45", "53 / 60", "88.33"]);
        assert_eq!(table.rows[1].cells, vec!["Grace", "-", "30", "30 / 60", "50.00"]);
        assert_eq!(table.rows[2].cells, vec!["Class Average", "8.0", "37.5", "", ""]);
        assert_eq!(table.rows[3].cells, vec!["Highest Score", "8", "45", "", ""]);
        assert!(table.rows[2].emphasis && table.rows[3].emphasis);
        assert!(!table.rows[0].emphasis);
    }

    #[test]
    fn test_missing_stats_render_not_available() {
        let students = roster();
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let no_stats = ActivityStatsById::new();
        let ctx = ReportContext::new("7", &analytics.students, &columns, &no_stats, &course);

        let table = detailed_grades_table(&ctx);
        assert_eq!(table.rows[2].cells[1], "N/A");
        let stats = activity_statistics_table(&ctx);
        assert_eq!(stats.rows[0].cells, vec!["Quiz 1", "10", "N/A", "N/A", "N/A"]);
    }

    #[test]
    fn test_sections_and_page_breaks() {
        let students = roster();
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let ctx = ReportContext::new("7", &analytics.students, &columns, &analytics.activity_stats, &course);

        let doc = build_report(&ctx, Some(&FixedSurface));
        assert_eq!(doc.page_count(), 3);
        assert_eq!(
            headings(&doc),
            vec![
                (0, REPORT_TITLE.to_string()),
                (0, "Course Overview".to_string()),
                (0, "Grade Distribution".to_string()),
                (0, "Grade Distribution Chart".to_string()),
                (1, "Detailed Grades".to_string()),
                (2, "Activity Statistics Summary".to_string()),
            ]
        );
        assert_eq!(
            doc.pages()[2].footer.as_deref(),
            Some("Page 3 of 3 | Generated from Gradebook System")
        );
    }

    #[test]
    fn test_chart_failure_skips_section() {
        let students = roster();
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let ctx = ReportContext::new("7", &analytics.students, &columns, &analytics.activity_stats, &course);

        for doc in [build_report(&ctx, Some(&FailingSurface)), build_report(&ctx, None)] {
            assert!(headings(&doc)
                .iter()
                .all(|(_, h)| h != "Grade Distribution Chart"));
            assert!(doc
                .pages()
                .iter()
                .flat_map(|p| &p.blocks)
                .all(|b| !matches!(b, Block::Image { .. })));
        }
    }

    #[test]
    fn test_overview_rows() {
        let students = roster();
        let analytics = analyze(&students);
        let columns = activity_columns(&students);
        let course = analytics.course_analytics();
        let ctx = ReportContext::new("7", &analytics.students, &columns, &analytics.activity_stats, &course);

        let doc = build_report(&ctx, None);
        let overview = doc.pages()[0]
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table { header, rows, .. } if header[0] == "Metric" => Some(rows.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(overview[0].cells, vec!["Number of Students", "2"]);
        assert_eq!(overview[1].cells, vec!["Class Average", "69.17%"]);
        assert_eq!(overview[2].cells, vec!["Gradable Items", "2"]);
    }
}
