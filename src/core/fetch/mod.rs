//! Activity and gradebook retrieval
//!
//! One request per course selection, no automatic retry. Failures surface as
//! [`FetchState::Failed`] with the service's message.

pub mod selection;
pub mod service;

pub use selection::{CourseSelection, FetchState, RequestTicket};
pub use service::{parse_gradebook_json, FileGradeService, GradeService, HttpGradeService};

use crate::core::error::Result;
use crate::core::models::CourseGradebook;

/// Fetch a course's gradebook
///
/// # Errors
/// Returns the service error unchanged
pub async fn fetch_gradebook<S>(service: &S, course_id: &str) -> Result<CourseGradebook>
where
    S: GradeService + ?Sized + Sync,
{
    let students = service.course_gradebook(course_id).await?;
    crate::info!(
        "Fetched gradebook for course {course_id}: {} students",
        students.len()
    );
    Ok(CourseGradebook::new(course_id, students))
}

/// Select `course_id`, fetch its gradebook and record the outcome.
///
/// Returns the resulting state. A response that lost a race against a newer
/// selection is dropped by [`CourseSelection::resolve`].
pub async fn load_course<'a, S>(
    selection: &'a mut CourseSelection<CourseGradebook>,
    service: &S,
    course_id: &str,
) -> &'a FetchState<CourseGradebook>
where
    S: GradeService + ?Sized + Sync,
{
    let ticket = selection.select(course_id);
    let outcome = fetch_gradebook(service, course_id).await;
    selection.resolve(ticket, outcome);
    selection.state()
}
