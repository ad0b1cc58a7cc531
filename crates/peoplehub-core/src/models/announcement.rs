//! Company announcements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, normalize_token};

/// Announcement priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementPriority {
    /// Informational.
    Low,
    /// Default.
    #[default]
    Normal,
    /// Highlighted.
    High,
    /// Pinned and pushed to everyone.
    Urgent,
}

impl AnnouncementPriority {
    /// Returns the storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for AnnouncementPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Self::Low),
            "normal" | "medium" => Ok(Self::Normal),
            "high" | "important" => Ok(Self::High),
            "urgent" | "critical" => Ok(Self::Urgent),
            other => Err(DomainError::invalid("announcement priority", other)),
        }
    }
}

/// A row of the `announcements` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Priority.
    pub priority: AnnouncementPriority,
    /// Author profile ID.
    pub created_by: String,
    /// Publication time.
    pub created_at: DateTime<Utc>,
}

/// Input for inserting an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnouncement {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Priority.
    pub priority: AnnouncementPriority,
    /// Author profile ID.
    pub created_by: String,
}

impl NewAnnouncement {
    /// Validates the announcement input.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::MissingField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::MissingField("content"));
        }
        Ok(())
    }
}
