//! Gradebook records as served by the course gradebook endpoint

use serde::{Deserialize, Serialize};

/// Identifier of a gradable activity
pub type ActivityId = i64;

/// Identifier of an enrolled person
pub type PersonId = i64;

/// One student's result on one gradable activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityGrade {
    /// Activity this grade belongs to
    pub activity_id: ActivityId,

    /// Activity title as shown in gradebook headers
    pub activity_title: String,

    /// Maximum attainable marks
    pub max_marks: f64,

    /// Marks awarded; `None` when not submitted or not yet graded
    #[serde(default)]
    pub marks_obtained: Option<f64>,
}

impl ActivityGrade {
    /// Create a grade record
    #[must_use]
    pub fn new(
        activity_id: ActivityId,
        activity_title: impl Into<String>,
        max_marks: f64,
        marks_obtained: Option<f64>,
    ) -> Self {
        Self {
            activity_id,
            activity_title: activity_title.into(),
            max_marks,
            marks_obtained,
        }
    }

    /// Whether a mark has been recorded
    #[must_use]
    pub const fn is_graded(&self) -> bool {
        self.marks_obtained.is_some()
    }
}

/// All grades of one enrolled student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGradebook {
    /// Student identifier
    pub person_id: PersonId,

    /// Display name
    pub student_name: String,

    /// Contact email, when the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,

    /// One record per course activity
    #[serde(default)]
    pub grades: Vec<ActivityGrade>,
}

impl StudentGradebook {
    /// Create a student gradebook without an email
    #[must_use]
    pub fn new(person_id: PersonId, student_name: impl Into<String>, grades: Vec<ActivityGrade>) -> Self {
        Self {
            person_id,
            student_name: student_name.into(),
            student_email: None,
            grades,
        }
    }

    /// Look up this student's record for an activity
    #[must_use]
    pub fn grade_for(&self, activity_id: ActivityId) -> Option<&ActivityGrade> {
        self.grades.iter().find(|g| g.activity_id == activity_id)
    }

    /// Marks recorded for an activity, `None` when ungraded or absent
    #[must_use]
    pub fn marks_for(&self, activity_id: ActivityId) -> Option<f64> {
        self.grade_for(activity_id).and_then(|g| g.marks_obtained)
    }
}

/// A gradebook column: one activity with its title and maximum marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityColumn {
    /// Activity identifier
    pub activity_id: ActivityId,
    /// Activity title
    pub title: String,
    /// Maximum attainable marks
    pub max_marks: f64,
}

impl From<&ActivityGrade> for ActivityColumn {
    fn from(grade: &ActivityGrade) -> Self {
        Self {
            activity_id: grade.activity_id,
            title: grade.activity_title.clone(),
            max_marks: grade.max_marks,
        }
    }
}

/// Ordered activity columns of a course gradebook.
///
/// Every student carries the same activity list, so the first student's
/// grades define the columns. An empty roster has no columns.
#[must_use]
pub fn activity_columns(students: &[StudentGradebook]) -> Vec<ActivityColumn> {
    students
        .first()
        .map(|s| s.grades.iter().map(ActivityColumn::from).collect())
        .unwrap_or_default()
}

/// A course's full gradebook as returned by the gradebook endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGradebook {
    /// Course the gradebook belongs to
    pub course_id: String,
    /// Enrolled students in service order
    pub students: Vec<StudentGradebook>,
}

impl CourseGradebook {
    /// Wrap a fetched roster
    #[must_use]
    pub fn new(course_id: impl Into<String>, students: Vec<StudentGradebook>) -> Self {
        Self {
            course_id: course_id.into(),
            students,
        }
    }

    /// Ordered activity columns
    #[must_use]
    pub fn columns(&self) -> Vec<ActivityColumn> {
        activity_columns(&self.students)
    }

    /// Whether there is nothing to analyse or export
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
