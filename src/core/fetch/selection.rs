//! Course selection state and stale-response guarding
//!
//! Each selection change issues a [`RequestTicket`]. A response is applied
//! only when its ticket belongs to the most recent selection, so a slow fetch
//! for a previously selected course can never overwrite the current one.

use crate::core::error::Result;

/// Outcome of the most recent fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Nothing selected yet
    Idle,
    /// A request for `course_id` is in flight
    Pending {
        /// Course being fetched
        course_id: String,
    },
    /// Data for `course_id` arrived
    Loaded {
        /// Course the data belongs to
        course_id: String,
        /// Fetched payload
        data: T,
    },
    /// The request for `course_id` failed
    Failed {
        /// Course that failed to load
        course_id: String,
        /// Message suitable for inline display
        message: String,
    },
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> FetchState<T> {
    /// Whether a request is in flight
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Loaded payload, if any
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Failure message, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Tag identifying which selection a request was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    /// Course the request targets
    pub course_id: String,
    generation: u64,
}

/// Currently selected course and the state of its data
#[derive(Debug)]
pub struct CourseSelection<T> {
    generation: u64,
    state: FetchState<T>,
}

impl<T> Default for CourseSelection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CourseSelection<T> {
    /// Create an empty selection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: FetchState::Idle,
        }
    }

    /// Select a course and obtain the ticket for its fetch.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn select(&mut self, course_id: &str) -> RequestTicket {
        self.generation += 1;
        self.state = FetchState::Pending {
            course_id: course_id.to_string(),
        };
        RequestTicket {
            course_id: course_id.to_string(),
            generation: self.generation,
        }
    }

    /// Whether `ticket` belongs to the current selection
    #[must_use]
    pub const fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a fetch outcome. Returns `false` and leaves the state untouched
    /// when the ticket is stale.
    pub fn resolve(&mut self, ticket: RequestTicket, outcome: Result<T>) -> bool {
        if !self.is_current(&ticket) {
            crate::debug!(
                "Discarding stale response for course {} (selection moved on)",
                ticket.course_id
            );
            return false;
        }

        self.state = match outcome {
            Ok(data) => FetchState::Loaded {
                course_id: ticket.course_id,
                data,
            },
            Err(e) => {
                crate::error!("Error fetching gradebook for course {}: {e}", ticket.course_id);
                FetchState::Failed {
                    course_id: ticket.course_id,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Take the loaded payload out, returning the selection to idle
    pub fn take(&mut self) -> FetchState<T> {
        std::mem::take(&mut self.state)
    }
}
