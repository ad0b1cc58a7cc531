//! Leave request data structures.
//!
//! A leave request starts `pending` and can leave that state exactly once,
//! to either `approved` or `rejected`. Both are terminal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, normalize_token};

/// Lifecycle state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved by a manager or HR.
    Approved,
    /// Rejected by a manager or HR.
    Rejected,
}

impl LeaveStatus {
    /// Returns the storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Approved and rejected requests never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: Self) -> bool {
        self == Self::Pending && next.is_terminal()
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(DomainError::invalid("leave status", other)),
        }
    }
}

/// A reviewer's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// Move to `approved`.
    Approve,
    /// Move to `rejected`.
    Reject,
}

impl LeaveDecision {
    /// The status this decision produces.
    pub fn target_status(self) -> LeaveStatus {
        match self {
            Self::Approve => LeaveStatus::Approved,
            Self::Reject => LeaveStatus::Rejected,
        }
    }
}

/// A row of the `leave_requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: String,
    /// Profile that requested the leave.
    pub user_id: String,
    /// Kind of leave (annual, sick, ...).
    pub leave_type: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-form reason.
    pub reason: Option<String>,
    /// Current status.
    pub status: LeaveStatus,
    /// Reviewer profile ID, set on the pending -> terminal transition.
    pub reviewed_by: Option<String>,
    /// When the review happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Number of calendar days covered, inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Input for inserting a leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// Requesting profile.
    pub user_id: String,
    /// Kind of leave.
    pub leave_type: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Optional reason.
    pub reason: Option<String>,
}

impl NewLeaveRequest {
    /// Validates the date range and leave type.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.leave_type.trim().is_empty() {
            return Err(DomainError::MissingField("leave_type"));
        }
        if self.end_date < self.start_date {
            return Err(DomainError::Validation(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transitions_only_out_of_pending() {
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
        assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Rejected));
        assert!(!LeaveStatus::Rejected.can_transition_to(LeaveStatus::Approved));
        assert!(!LeaveStatus::Pending.can_transition_to(LeaveStatus::Pending));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Approved".parse::<LeaveStatus>().unwrap(), LeaveStatus::Approved);
        assert!("cancelled".parse::<LeaveStatus>().is_err());
    }

    #[test]
    fn test_new_leave_validation() {
        let mut input = NewLeaveRequest {
            user_id: "u1".to_string(),
            leave_type: "annual".to_string(),
            start_date: date("2026-03-02"),
            end_date: date("2026-03-06"),
            reason: None,
        };
        assert!(input.validate().is_ok());

        input.end_date = date("2026-03-01");
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));

        input.end_date = date("2026-03-06");
        input.leave_type = " ".to_string();
        assert_eq!(input.validate(), Err(DomainError::MissingField("leave_type")));
    }

    #[test]
    fn test_decision_targets() {
        assert_eq!(LeaveDecision::Approve.target_status(), LeaveStatus::Approved);
        assert_eq!(LeaveDecision::Reject.target_status(), LeaveStatus::Rejected);
    }
}
