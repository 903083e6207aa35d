//! Course activity model

use super::gradebook::ActivityId;
use serde::{Deserialize, Serialize};

/// A gradable activity as listed by the course activities endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity identifier
    pub id: ActivityId,

    /// Activity title
    pub title: String,

    /// Activity kind reported by the service (e.g. "ASSIGNMENT", "QUIZ")
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Activity {
    /// Create a new activity
    #[must_use]
    pub fn new(id: ActivityId, title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_maps_to_kind() {
        let activity: Activity =
            serde_json::from_str(r#"{"id": 4, "title": "Midterm", "type": "QUIZ"}"#).unwrap();
        assert_eq!(activity, Activity::new(4, "Midterm", "QUIZ"));
    }

    #[test]
    fn test_missing_type_defaults_to_empty() {
        let activity: Activity = serde_json::from_str(r#"{"id": 1, "title": "Lab"}"#).unwrap();
        assert!(activity.kind.is_empty());
    }
}
