//! Analyze command handler
//!
//! Prints the course overview, the grade distribution with a text bar per
//! bucket, and per-activity statistics.

use super::source::{self, AnalyzedCourse, EMPTY_COURSE_MESSAGE};
use crate::args::SourceArgs;
use gradebook_analytics::config::Config;
use gradebook_analytics::verbose;

/// Widest distribution bar in characters
const BAR_WIDTH: usize = 40;

/// Run the analyze command
pub fn run(source: &SourceArgs, config: &Config) -> Result<(), String> {
    let course = source::load(source, config)?;
    if course.is_empty() {
        println!("{EMPTY_COURSE_MESSAGE}");
        return Ok(());
    }

    print_overview(&course);
    print_distribution(&course);
    print_activity_stats(&course);
    if gradebook_analytics::logger::is_verbose_enabled() {
        print_students(&course);
    }
    Ok(())
}

fn print_overview(course: &AnalyzedCourse) {
    println!("\n=== Course {} ===", course.gradebook.course_id);
    println!("Number of Students: {}", course.analytics.students.len());
    println!("Class Average:      {:.2}%", course.course.class_average);
    println!("Gradable Items:     {}", course.columns.len());
}

/// Bar length for `count` out of the largest bucket `max`
fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}

fn print_distribution(course: &AnalyzedCourse) {
    let distribution = &course.course.grade_distribution;
    let max = distribution.max_count();

    println!("\n=== Grade Distribution ===");
    for (label, count) in distribution.iter() {
        println!("{label:>7} | {:<BAR_WIDTH$} {count}", bar(count, max));
    }
}

fn print_activity_stats(course: &AnalyzedCourse) {
    let title_width = course
        .columns
        .iter()
        .map(|c| c.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Activity".len());

    println!("\n=== Activity Statistics ===");
    println!(
        "{:<title_width$}  {:>9}  {:>9}  {:>7}  {:>7}",
        "Activity", "Max Marks", "Average", "High", "Low"
    );
    for column in &course.columns {
        match course.analytics.activity_stats.get(&column.activity_id) {
            Some(stats) => println!(
                "{:<title_width$}  {:>9}  {:>9.1}  {:>7}  {:>7}",
                column.title, column.max_marks, stats.average, stats.high, stats.low
            ),
            None => println!(
                "{:<title_width$}  {:>9}  {:>9}  {:>7}  {:>7}",
                column.title, column.max_marks, "N/A", "N/A", "N/A"
            ),
        }
    }
}

fn print_students(course: &AnalyzedCourse) {
    verbose!("\n=== Students ===");
    for student in &course.analytics.students {
        verbose!(
            "{:<30} {:>8} / {:<8} {:>7.2}%",
            student.name(),
            student.total_marks,
            student.total_max_marks,
            student.average_percentage
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_largest_bucket() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(4, 4).chars().count(), BAR_WIDTH);
        assert_eq!(bar(2, 4).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(1, 3).chars().count(), 14);
        assert_eq!(bar(0, 3), "");
    }
}
