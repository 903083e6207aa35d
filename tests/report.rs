//! Integration tests for report layout and export

use gradebook_analytics::analytics::{analyze, CourseAnalytics, GradebookAnalytics};
use gradebook_analytics::export::{export_gradebook_csv, render_gradebook_csv};
use gradebook_analytics::fetch::parse_gradebook_json;
use gradebook_analytics::models::{activity_columns, ActivityColumn, ActivityGrade, StudentGradebook};
use gradebook_analytics::report::{
    build_report, detailed_grades_table, export_report, Block, ChartSurface, DistributionChart,
    DocumentBuilder, ExportOptions, ReportContext, ReportFormat,
};
use gradebook_analytics::report::document::{MARGIN, PAGE_HEIGHT};

const FIXTURE: &str = include_str!("fixtures/gradebook.json");

struct Course {
    analytics: GradebookAnalytics,
    course: CourseAnalytics,
    columns: Vec<ActivityColumn>,
}

impl Course {
    fn new(students: &[StudentGradebook]) -> Self {
        let analytics = analyze(students);
        let course = analytics.course_analytics();
        Self {
            analytics,
            course,
            columns: activity_columns(students),
        }
    }

    fn context<'a>(&'a self, course_id: &'a str) -> ReportContext<'a> {
        ReportContext::new(
            course_id,
            &self.analytics.students,
            &self.columns,
            &self.analytics.activity_stats,
            &self.course,
        )
    }
}

fn fixture_course() -> Course {
    Course::new(&parse_gradebook_json(FIXTURE).unwrap())
}

fn large_roster(n: i64) -> Vec<StudentGradebook> {
    (0..n)
        .map(|i| {
            StudentGradebook::new(
                i,
                format!("Student {i:03}"),
                vec![
                    ActivityGrade::new(1, "Quiz", 10.0, Some((i % 11) as f64)),
                    ActivityGrade::new(2, "Exam", 90.0, Some(((i * 7) % 91) as f64)),
                ],
            )
        })
        .collect()
}

#[test]
fn detailed_table_dimensions() {
    let course = fixture_course();
    let ctx = course.context("12");
    let table = detailed_grades_table(&ctx);

    assert_eq!(table.rows.len(), 3 + 2);
    assert_eq!(table.column_count(), 1 + 3 + 2);
    assert!(table.rows.iter().all(|r| r.cells.len() == table.column_count()));
    assert_eq!(table.rows[1].cells[2], "-");
    assert_eq!(table.rows[3].cells[1..4], ["7.7", "15.5", "60.5"]);
    assert_eq!(table.rows[4].cells[1..4], ["9", "19", "65"]);
}

#[test]
fn long_roster_paginates_detailed_grades() {
    let students = large_roster(80);
    let course = Course::new(&students);
    let ctx = course.context("3");
    let doc = build_report(&ctx, None);

    assert!(doc.page_count() >= 5);

    // header repeated on every page carrying part of the detailed table
    let detailed_pages: Vec<_> = doc
        .pages()
        .iter()
        .filter(|p| {
            p.blocks.iter().any(|b| {
                matches!(b, Block::Table { header, .. } if header[0] == "Student Name")
            })
        })
        .collect();
    assert!(detailed_pages.len() >= 2);

    let body_rows: usize = detailed_pages
        .iter()
        .flat_map(|p| &p.blocks)
        .filter_map(|b| match b {
            Block::Table { header, rows, .. } if header[0] == "Student Name" => Some(rows.len()),
            _ => None,
        })
        .sum();
    assert_eq!(body_rows, 80 + 2);

    let total = doc.page_count();
    for (i, page) in doc.pages().iter().enumerate() {
        assert_eq!(
            page.footer.as_deref(),
            Some(format!("Page {} of {total} | Generated from Gradebook System", i + 1).as_str())
        );
    }
}

#[test]
fn wide_roster_with_long_names_stays_inside_pages() {
    let students: Vec<StudentGradebook> = (0..40_i64)
        .map(|i| {
            StudentGradebook::new(
                i,
                format!("Featherstonehaugh-Montgomery, Bartholomew {i:02}"),
                (1..=15_i64)
                    .map(|a| {
                        ActivityGrade::new(a, format!("Assignment {a}"), 10.0, Some(((i + a) % 11) as f64))
                    })
                    .collect(),
            )
        })
        .collect();
    let course = Course::new(&students);
    let ctx = course.context("9");
    let doc = build_report(&ctx, None);

    let mut placed = 0;
    for page in doc.pages() {
        for block in &page.blocks {
            if let Block::Table {
                header,
                rows,
                header_height,
                row_heights,
                y,
                end_y,
            } = block
            {
                if header[0] != "Student Name" {
                    continue;
                }
                // wrapped header and names make rows taller than a single line
                assert!(*header_height > 13.0);
                assert!(row_heights.iter().all(|h| *h > 8.0));
                assert_eq!(rows.len(), row_heights.len());
                let planned = y + header_height + row_heights.iter().sum::<f64>();
                assert!((planned - end_y).abs() < 1e-6);
                assert!(*end_y <= PAGE_HEIGHT - MARGIN + 1e-9);
                placed += rows.len();
            }
        }
    }
    assert_eq!(placed, 40 + 2);
}

#[test]
fn chart_embedded_in_html_export() {
    let course = fixture_course();
    let ctx = course.context("12");
    let chart = DistributionChart::new(course.course.grade_distribution.clone(), 400, 200);
    let dir = tempfile::tempdir().unwrap();

    let path = export_report(
        &ctx,
        Some(&chart as &dyn ChartSurface),
        &ExportOptions {
            format: ReportFormat::Html,
            output_dir: dir.path(),
            pdf_converter: None,
        },
    )
    .unwrap();

    assert_eq!(path, dir.path().join("gradebook-report-course-12.html"));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Gradebook &amp; Analytics Report"));
    assert!(html.contains("Course ID: 12"));
    assert!(html.contains("Grade Distribution Chart"));
    assert!(html.contains("data:image/png;base64,iVBORw0KGgo"));
    assert!(html.contains("<td>Class Average</td><td>58.33%</td>"));
    assert!(html.contains("Page 3 of 3 | Generated from Gradebook System"));
}

#[test]
fn markdown_export_without_chart() {
    let course = fixture_course();
    let ctx = course.context("12");
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("reports");

    let path = export_report(
        &ctx,
        None,
        &ExportOptions {
            format: ReportFormat::Markdown,
            output_dir: &out,
            pdf_converter: None,
        },
    )
    .unwrap();

    assert_eq!(path.file_name().unwrap(), "gradebook-report-course-12.md");
    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.starts_with("# Gradebook & Analytics Report"));
    assert!(md.contains("| 90-100 | 1 |"));
    assert!(md.contains("| <60 | 1 |"));
    assert!(md.contains("## Activity Statistics Summary"));
    assert!(md.contains("| Quiz 1 | 10 | 7.7 | 9 | 6 |"));
    assert!(!md.contains("Grade Distribution Chart"));
}

#[test]
fn pdf_export_with_unusable_converter_leaves_no_file() {
    let course = fixture_course();
    let ctx = course.context("12");
    let dir = tempfile::tempdir().unwrap();

    let result = export_report(
        &ctx,
        None,
        &ExportOptions {
            format: ReportFormat::Pdf,
            output_dir: dir.path(),
            pdf_converter: Some("/nonexistent/converter"),
        },
    );

    assert!(result.is_err());
    assert!(!dir.path().join("gradebook-report-course-12.pdf").exists());
}

#[test]
fn csv_export_matches_report_numbers() {
    let course = fixture_course();
    let ctx = course.context("12");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exports").join("grades.csv");

    export_gradebook_csv(&ctx, &path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, render_gradebook_csv(&ctx).unwrap());

    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines[0], "Course ID,12");
    assert_eq!(lines[2], "Class Average,58.33%");
    assert_eq!(lines[4], "");
    assert_eq!(
        lines[5],
        "Student Name,Quiz 1 ( / 10 ),Assignment 1 ( / 20 ),Midterm ( / 70 ),Total Score,Average (%)"
    );
    assert_eq!(lines[6], "Ada Lovelace,9,19,65,93 / 100,93.00");
    assert_eq!(lines[7], "Alan Turing,8,-,56,64 / 100,64.00");
    assert_eq!(lines[9], "Class Average,7.7,15.5,60.5,,");
    assert_eq!(lines.len(), 11);
}
