//! Activities command handler

use super::source;
use gradebook_analytics::config::Config;
use gradebook_analytics::info;

/// List the gradable activities of a course
pub fn run(course_id: &str, config: &Config) -> Result<(), String> {
    let service = source::service(None, config)?;
    let runtime = source::runtime()?;

    let activities = runtime
        .block_on(service.course_activities(course_id))
        .map_err(|e| format!("✗ {e}"))?;
    info!("Course {course_id} has {} activities", activities.len());

    if activities.is_empty() {
        println!("No activities found for course {course_id}.");
        return Ok(());
    }

    let title_width = activities
        .iter()
        .map(|a| a.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());

    println!("{:>8}  {:<title_width$}  Type", "ID", "Title");
    for activity in &activities {
        println!("{:>8}  {:<title_width$}  {}", activity.id, activity.title, activity.kind);
    }
    Ok(())
}
