//! Role-scoped context for the model.
//!
//! The snapshot only shapes what the model sees. The executor re-checks
//! every action against the trusted actor and never reads this payload.

use chrono::{DateTime, Utc};
use peoplehub_core::{
    Actor, Announcement, DataStore, LeaveFilter, LeaveRequest, StorageResult, Task, TaskFilter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::action::ActionKind;
use crate::navigation::{ResolvedRoute, RouteTable};

/// Data handed to the model for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantContext {
    /// The caller.
    pub actor: Actor,
    /// Employees: their own requests. Reviewers: everything pending.
    pub leave_requests: Vec<LeaveRequest>,
    /// Employees: tasks assigned to them. Reviewers: all open tasks.
    pub tasks: Vec<Task>,
    /// Latest announcements.
    pub announcements: Vec<Announcement>,
    /// Pages the caller may open.
    pub routes: Vec<ResolvedRoute>,
    /// Snapshot time.
    pub generated_at: DateTime<Utc>,
}

/// Builds [`AssistantContext`] snapshots from the store.
#[derive(Clone)]
pub struct ContextBuilder {
    store: Arc<dyn DataStore>,
    routes: RouteTable,
    list_limit: usize,
    announcement_limit: usize,
}

impl ContextBuilder {
    /// Creates a builder with default list sizes.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store, routes: RouteTable, list_limit: 25, announcement_limit: 5 }
    }

    /// Caps leave and task lists.
    #[must_use]
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    /// Caps the announcement list.
    #[must_use]
    pub fn with_announcement_limit(mut self, limit: usize) -> Self {
        self.announcement_limit = limit;
        self
    }

    /// Loads the snapshot visible to `actor`.
    pub async fn build(&self, actor: &Actor) -> StorageResult<AssistantContext> {
        let (leave_filter, task_filter) = if actor.role.is_privileged() {
            (LeaveFilter::pending(), TaskFilter::default().open())
        } else {
            (LeaveFilter::for_user(&actor.id), TaskFilter::assigned_to(&actor.id))
        };

        let leave_requests =
            self.store.list_leave_requests(&leave_filter.with_limit(self.list_limit)).await?;
        let tasks = self.store.list_tasks(&task_filter.with_limit(self.list_limit)).await?;
        let announcements = self.store.list_announcements(self.announcement_limit).await?;
        let routes = self.routes.accessible(actor.role).into_iter().map(ResolvedRoute::from).collect();

        debug!(
            actor_id = %actor.id,
            leave = leave_requests.len(),
            tasks = tasks.len(),
            announcements = announcements.len(),
            "Built assistant context"
        );

        Ok(AssistantContext {
            actor: actor.clone(),
            leave_requests,
            tasks,
            announcements,
            routes,
            generated_at: Utc::now(),
        })
    }
}

/// Builds the system prompt: the action contract followed by the context.
pub fn system_prompt(context: &AssistantContext) -> String {
    let functions =
        ActionKind::ALL.iter().map(|kind| kind.as_str()).collect::<Vec<_>>().join(", ");
    let context_json = serde_json::to_string_pretty(context).unwrap_or_default();

    format!(
        "You are the PeopleHub HR assistant for a {role} user.\n\
         Answer in plain language. To perform actions, append one JSON document:\n\
         {{\"actions\": [{{\"function\": \"<name>\", \"params\": {{...}}}}]}}\n\
         Available functions: {functions}.\n\
         Use record ids exactly as they appear in the context. Only managers and HR may \
         approve or reject leave and publish announcements.\n\n\
         Context:\n{context_json}",
        role = context.actor.role,
    )
}
