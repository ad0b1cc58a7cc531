//! Data store contract consumed by the assistant pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Actor, Announcement, LeaveDecision, LeaveRequest, LeaveStatus, NewAnnouncement,
    NewLeaveRequest, NewTask, Profile, Task, TaskStatus,
};
use crate::storage::error::StorageResult;

/// Filter for listing leave requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveFilter {
    /// Only requests made by this profile.
    pub user_id: Option<String>,
    /// Only requests in this state.
    pub status: Option<LeaveStatus>,
    /// Maximum number of rows, newest first.
    pub limit: Option<usize>,
}

impl LeaveFilter {
    /// Requests made by `user_id`.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self { user_id: Some(user_id.into()), ..Self::default() }
    }

    /// Requests awaiting review.
    pub fn pending() -> Self {
        Self { status: Some(LeaveStatus::Pending), ..Self::default() }
    }

    /// Caps the number of rows.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filter for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks assigned to this profile.
    pub assigned_to: Option<String>,
    /// Only tasks in this state.
    pub status: Option<TaskStatus>,
    /// Skip completed tasks.
    pub open_only: bool,
    /// Maximum number of rows, newest first.
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// Tasks assigned to `user_id`.
    pub fn assigned_to(user_id: impl Into<String>) -> Self {
        Self { assigned_to: Some(user_id.into()), ..Self::default() }
    }

    /// Tasks that are not completed.
    #[must_use]
    pub fn open(mut self) -> Self {
        self.open_only = true;
        self
    }

    /// Caps the number of rows.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Kind of row change reported on the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
}

/// A change-feed notification: `(table, eventType, row)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// Table that changed.
    pub table: String,
    /// Insert or update.
    pub event_type: ChangeType,
    /// The row after the change.
    pub row: Value,
}

/// Async data store interface.
///
/// Implementations must apply [`DataStore::resolve_leave_request`] as one
/// atomic conditional update so that concurrent reviewers cannot both move
/// the same request out of `pending`.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Inserts a profile.
    async fn insert_profile(&self, profile: &Profile) -> StorageResult<()>;

    /// Loads a profile.
    async fn get_profile(&self, id: &str) -> StorageResult<Profile>;

    /// Lists all profiles ordered by name.
    async fn list_profiles(&self) -> StorageResult<Vec<Profile>>;

    /// Resolves the trusted actor for a profile ID.
    async fn get_actor(&self, id: &str) -> StorageResult<Actor> {
        Ok(self.get_profile(id).await?.actor())
    }

    /// Inserts a pending leave request.
    async fn insert_leave_request(&self, input: &NewLeaveRequest) -> StorageResult<LeaveRequest>;

    /// Loads a leave request.
    async fn get_leave_request(&self, id: &str) -> StorageResult<LeaveRequest>;

    /// Moves a request out of `pending`.
    ///
    /// Returns the number of rows changed: `1` when this call performed the
    /// transition, `0` when the request was missing or no longer pending.
    async fn resolve_leave_request(
        &self,
        id: &str,
        decision: LeaveDecision,
        reviewer_id: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StorageResult<usize>;

    /// Lists leave requests.
    async fn list_leave_requests(&self, filter: &LeaveFilter) -> StorageResult<Vec<LeaveRequest>>;

    /// Inserts a task.
    async fn insert_task(&self, input: &NewTask) -> StorageResult<Task>;

    /// Loads a task.
    async fn get_task(&self, id: &str) -> StorageResult<Task>;

    /// Sets a task's status.
    ///
    /// With `owner_scope` set, only the assignee or creator may change the
    /// task; other callers get `StorageError::Forbidden`. Unknown IDs yield
    /// `StorageError::NotFound`.
    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
        owner_scope: Option<&str>,
    ) -> StorageResult<Task>;

    /// Lists tasks.
    async fn list_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>>;

    /// Inserts an announcement.
    async fn insert_announcement(&self, input: &NewAnnouncement) -> StorageResult<Announcement>;

    /// Lists the most recent announcements.
    async fn list_announcements(&self, limit: usize) -> StorageResult<Vec<Announcement>>;
}
