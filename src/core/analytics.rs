//! Gradebook analytics
//!
//! Pure computations over a course roster: per-student totals and
//! percentages, per-activity class statistics, the class average and the
//! five-band grade distribution. Nothing here performs I/O or keeps state,
//! so running the same input twice yields identical results.

use crate::core::models::{ActivityId, StudentGradebook};
use serde::Serialize;
use std::collections::HashMap;

/// Class statistics per activity keyed by activity id.
pub type ActivityStatsById = HashMap<ActivityId, ActivityStats>;

/// Class statistics for a single activity, over graded students only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ActivityStats {
    /// Mean of the recorded marks
    pub average: f64,
    /// Highest recorded mark
    pub high: f64,
    /// Lowest recorded mark
    pub low: f64,
}

impl ActivityStats {
    /// Statistics over a set of recorded marks; all zero when `marks` is empty.
    #[must_use]
    pub fn from_marks(marks: &[f64]) -> Self {
        if marks.is_empty() {
            return Self::default();
        }
        let high = marks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = marks.iter().copied().fold(f64::INFINITY, f64::min);
        Self {
            average: mean(marks),
            high,
            low,
        }
    }
}

/// A student's gradebook together with derived totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnalytics {
    /// Source gradebook
    #[serde(flatten)]
    pub student: StudentGradebook,
    /// Sum of recorded marks (ungraded activities contribute nothing)
    pub total_marks: f64,
    /// Sum of maximum marks over every activity, graded or not
    pub total_max_marks: f64,
    /// `total_marks / total_max_marks * 100`, or 0 when there are no attainable marks
    pub average_percentage: f64,
}

impl StudentAnalytics {
    /// Derive totals for one student.
    ///
    /// The percentage is not clamped: marks above an activity's maximum are
    /// accepted and may push it past 100.
    #[must_use]
    pub fn from_student(student: &StudentGradebook) -> Self {
        let total_marks: f64 = student.grades.iter().filter_map(|g| g.marks_obtained).sum();
        let total_max_marks: f64 = student.grades.iter().map(|g| g.max_marks).sum();
        let average_percentage = if total_max_marks > 0.0 {
            total_marks / total_max_marks * 100.0
        } else {
            0.0
        };

        Self {
            student: student.clone(),
            total_marks,
            total_max_marks,
            average_percentage,
        }
    }

    /// Student display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.student.student_name
    }
}

/// Per-student and per-activity analytics for one course
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradebookAnalytics {
    /// Students in roster order with derived totals
    pub students: Vec<StudentAnalytics>,
    /// Class statistics per activity
    pub activity_stats: ActivityStatsById,
}

impl GradebookAnalytics {
    /// Course-level aggregation over the analysed students
    #[must_use]
    pub fn course_analytics(&self) -> CourseAnalytics {
        compute_course_analytics(&self.students)
    }
}

/// Percentage band used by the grade distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeBand {
    /// 90 and above
    NinetyToHundred,
    /// 80 up to 90
    Eighties,
    /// 70 up to 80
    Seventies,
    /// 60 up to 70
    Sixties,
    /// Below 60
    BelowSixty,
}

impl GradeBand {
    /// All bands in display order, highest first
    pub const ALL: [Self; 5] = [
        Self::NinetyToHundred,
        Self::Eighties,
        Self::Seventies,
        Self::Sixties,
        Self::BelowSixty,
    ];

    /// Classify a percentage. Thresholds are checked from the top down and
    /// the first match wins.
    #[must_use]
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::NinetyToHundred
        } else if percentage >= 80.0 {
            Self::Eighties
        } else if percentage >= 70.0 {
            Self::Seventies
        } else if percentage >= 60.0 {
            Self::Sixties
        } else {
            Self::BelowSixty
        }
    }

    /// Histogram label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NinetyToHundred => "90-100",
            Self::Eighties => "80-89",
            Self::Seventies => "70-79",
            Self::Sixties => "60-69",
            Self::BelowSixty => "<60",
        }
    }

    /// Position in [`GradeBand::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Histogram of students per percentage band
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeDistribution {
    /// Band labels, always the five bands in fixed order
    pub labels: [&'static str; 5],
    /// Student count per band, parallel to `labels`
    pub data: [usize; 5],
}

impl Default for GradeDistribution {
    fn default() -> Self {
        Self {
            labels: GradeBand::ALL.map(GradeBand::label),
            data: [0; 5],
        }
    }
}

impl GradeDistribution {
    /// Count one student into the band for `percentage`
    pub fn record(&mut self, percentage: f64) {
        self.data[GradeBand::classify(percentage).index()] += 1;
    }

    /// Count for a band
    #[must_use]
    pub const fn count(&self, band: GradeBand) -> usize {
        self.data[band.index()]
    }

    /// Total number of students counted
    #[must_use]
    pub fn total(&self) -> usize {
        self.data.iter().sum()
    }

    /// Largest band count
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// `(label, count)` pairs in band order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.labels.iter().copied().zip(self.data.iter().copied())
    }
}

/// Course-level summary
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAnalytics {
    /// Mean of the students' average percentages, 0 for an empty roster
    pub class_average: f64,
    /// Students per percentage band
    pub grade_distribution: GradeDistribution,
}

/// Compute analytics for a course roster.
///
/// Activity statistics follow the activity list of the first student. A
/// student without a record for one of those activities counts as ungraded
/// for it. An empty roster produces empty results.
#[must_use]
pub fn analyze(students: &[StudentGradebook]) -> GradebookAnalytics {
    GradebookAnalytics {
        students: students.iter().map(StudentAnalytics::from_student).collect(),
        activity_stats: compute_activity_stats(students),
    }
}

/// Compute class statistics for every activity on the first student's list.
///
/// Only recorded marks take part: an ungraded record is excluded from the
/// average, the high and the low rather than counted as zero.
#[must_use]
pub fn compute_activity_stats(students: &[StudentGradebook]) -> ActivityStatsById {
    let Some(first) = students.first() else {
        return ActivityStatsById::new();
    };

    first
        .grades
        .iter()
        .map(|activity| {
            let marks: Vec<f64> = students
                .iter()
                .filter_map(|s| s.marks_for(activity.activity_id))
                .collect();
            (activity.activity_id, ActivityStats::from_marks(&marks))
        })
        .collect()
}

/// Compute the class average and grade distribution.
#[must_use]
pub fn compute_course_analytics(students: &[StudentAnalytics]) -> CourseAnalytics {
    let percentages: Vec<f64> = students.iter().map(|s| s.average_percentage).collect();

    let mut grade_distribution = GradeDistribution::default();
    for &p in &percentages {
        grade_distribution.record(p);
    }

    CourseAnalytics {
        class_average: mean(&percentages),
        grade_distribution,
    }
}

/// Arithmetic mean, 0 for an empty slice
#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
