//! Domain data structures for PeopleHub.
//!
//! Leave requests, tasks and announcements are owned by the data store. The
//! assistant pipeline mutates them through [`crate::storage::DataStore`] and
//! never keeps copies beyond a single call.

pub mod actor;
pub mod announcement;
pub mod leave;
pub mod task;

use thiserror::Error;

pub use actor::{Actor, Profile, Role};
pub use announcement::{Announcement, AnnouncementPriority, NewAnnouncement};
pub use leave::{LeaveDecision, LeaveRequest, LeaveStatus, NewLeaveRequest};
pub use task::{NewTask, Task, TaskPriority, TaskStatus};

/// Errors raised while building or parsing domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field held a value outside its allowed set.
    #[error("Invalid {field}: '{value}'")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// A required field was missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The record violates a cross-field rule.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue { field, value: value.into() }
    }
}

/// Normalizes enum-ish wire values: lowercase, spaces and dashes to underscores.
pub(crate) fn normalize_token(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}
