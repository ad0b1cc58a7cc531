//! Domain action executor.
//!
//! Turns one [`ActionRequest`] into at most one authorized store mutation and
//! always returns exactly one [`ActionResult`]. The actor is an explicit
//! argument on every call; nothing in the request can widen its role.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use peoplehub_core::{
    Actor, AnnouncementPriority, DataStore, LeaveDecision, NewAnnouncement, NewLeaveRequest,
    NewTask, StorageError, TaskPriority, TaskStatus,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::action::{ActionKind, ActionRequest, ActionResult, FailureKind};
use crate::navigation::{NavigationError, NavigationResolver};
use crate::notify::{Notifier, NotifyLevel, QueryCache, QueryKey};

/// Executes a single action on behalf of an actor.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Executes `request` for `actor`. Never fails; failures are results.
    async fn handle(&self, actor: &Actor, request: &ActionRequest) -> ActionResult;
}

/// Tunable authorization rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorPolicy {
    /// Restrict `update_task` to the task's assignee or creator.
    ///
    /// Off by default: any authenticated role may update any task.
    pub enforce_task_ownership: bool,
}

/// Early-exit helper: handlers return `Err(result)` to stop with a failure.
type Step<T> = std::result::Result<T, ActionResult>;

fn required<'a>(request: &'a ActionRequest, keys: &[&str]) -> Step<&'a str> {
    request.param_any(keys).ok_or_else(|| {
        ActionResult::failure(
            request.kind,
            FailureKind::InvalidParams,
            format!("Missing required parameter '{}' for {}", keys[0], request.kind),
        )
    })
}

fn parse_date(request: &ActionRequest, key: &str, value: &str) -> Step<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ActionResult::failure(
            request.kind,
            FailureKind::InvalidParams,
            format!("Invalid {} '{}': expected YYYY-MM-DD", key, value),
        )
    })
}

fn parse_param<T: std::str::FromStr>(request: &ActionRequest, key: &str, value: &str) -> Step<T>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        ActionResult::failure(request.kind, FailureKind::InvalidParams, format!("Invalid {}: {}", key, e))
    })
}

fn store_failure(kind: ActionKind, context: &str, err: &StorageError) -> ActionResult {
    ActionResult::failure(kind, FailureKind::StoreFailure, format!("{}: {}", context, err))
}

fn authorize_reviewer(actor: &Actor, kind: ActionKind, what: &str) -> Step<()> {
    if actor.role.is_privileged() {
        Ok(())
    } else {
        Err(ActionResult::failure(
            kind,
            FailureKind::Unauthorized,
            format!("Unauthorized: the {} role cannot {}", actor.role, what),
        ))
    }
}

/// Executes actions against a [`DataStore`].
pub struct DomainActionExecutor {
    store: Arc<dyn DataStore>,
    navigation: NavigationResolver,
    notifier: Arc<dyn Notifier>,
    cache: Arc<dyn QueryCache>,
    policy: ExecutorPolicy,
}

impl DomainActionExecutor {
    /// Creates an executor with the default policy.
    pub fn new(
        store: Arc<dyn DataStore>,
        navigation: NavigationResolver,
        notifier: Arc<dyn Notifier>,
        cache: Arc<dyn QueryCache>,
    ) -> Self {
        Self { store, navigation, notifier, cache, policy: ExecutorPolicy::default() }
    }

    /// Replaces the authorization policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ExecutorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active policy.
    pub fn policy(&self) -> ExecutorPolicy {
        self.policy
    }

    /// Executes `request` for `actor` and reports the outcome to the notifier.
    pub async fn execute(&self, actor: &Actor, request: &ActionRequest) -> ActionResult {
        debug!(actor_id = %actor.id, role = %actor.role, kind = %request.kind, "Executing action");

        let step = match request.kind {
            ActionKind::ApproveLeave => {
                self.resolve_leave(actor, request, LeaveDecision::Approve).await
            }
            ActionKind::RejectLeave => self.resolve_leave(actor, request, LeaveDecision::Reject).await,
            ActionKind::SubmitLeave => self.submit_leave(actor, request).await,
            ActionKind::CreateAnnouncement => self.create_announcement(actor, request).await,
            ActionKind::UpdateTask => self.update_task(actor, request).await,
            ActionKind::CreateTask => self.create_task(actor, request).await,
            ActionKind::Navigate => self.navigate(actor, request),
        };
        let result = step.unwrap_or_else(|failure| failure);

        if result.success {
            info!(actor_id = %actor.id, kind = %result.kind, "{}", result.message);
            self.notifier.notify(NotifyLevel::Success, &result.message);
        } else {
            warn!(
                actor_id = %actor.id,
                kind = %result.kind,
                failure = ?result.failure,
                "{}",
                result.message
            );
            self.notifier.notify(NotifyLevel::Error, &result.message);
        }
        result
    }

    async fn resolve_leave(
        &self,
        actor: &Actor,
        request: &ActionRequest,
        decision: LeaveDecision,
    ) -> Step<ActionResult> {
        let kind = request.kind;
        let verb = match decision {
            LeaveDecision::Approve => "approve",
            LeaveDecision::Reject => "reject",
        };
        authorize_reviewer(actor, kind, &format!("{} leave requests", verb))?;
        let id = required(request, &["id", "leave_id", "request_id"])?;

        let changed = self
            .store
            .resolve_leave_request(id, decision, &actor.id, Utc::now())
            .await
            .map_err(|e| store_failure(kind, &format!("Failed to {} leave request {}", verb, id), &e))?;

        let current = match self.store.get_leave_request(id).await {
            Ok(current) => current,
            Err(StorageError::NotFound(_)) => {
                return Err(ActionResult::failure(
                    kind,
                    FailureKind::StoreFailure,
                    format!("Leave request {} not found", id),
                ));
            }
            Err(e) => {
                return Err(store_failure(kind, &format!("Failed to load leave request {}", id), &e));
            }
        };

        if changed == 0 {
            // Already out of pending: report success without touching it
            return Ok(ActionResult::success(
                kind,
                format!("Leave request {} already {}", id, current.status),
            )
            .with_data(json!({ "changed": false, "leave_request": current })));
        }

        self.cache.invalidate(QueryKey::LeaveRequests);
        Ok(ActionResult::success(kind, format!("Leave request {} {}", id, current.status))
            .with_data(json!({ "changed": true, "leave_request": current })))
    }

    async fn submit_leave(&self, actor: &Actor, request: &ActionRequest) -> Step<ActionResult> {
        let kind = request.kind;
        let start = required(request, &["start_date", "from"])?;
        let end = required(request, &["end_date", "to"])?;
        let input = NewLeaveRequest {
            user_id: actor.id.clone(),
            leave_type: request
                .param_any(&["leave_type", "type"])
                .unwrap_or("annual")
                .to_lowercase(),
            start_date: parse_date(request, "start_date", start)?,
            end_date: parse_date(request, "end_date", end)?,
            reason: request.param("reason").map(str::to_string),
        };
        input.validate().map_err(|e| {
            ActionResult::failure(kind, FailureKind::InvalidParams, e.to_string())
        })?;

        let created = self
            .store
            .insert_leave_request(&input)
            .await
            .map_err(|e| store_failure(kind, "Failed to submit leave request", &e))?;

        self.cache.invalidate(QueryKey::LeaveRequests);
        Ok(ActionResult::success(
            kind,
            format!(
                "Submitted {} leave from {} to {}",
                created.leave_type, created.start_date, created.end_date
            ),
        )
        .with_data(json!(created)))
    }

    async fn create_announcement(&self, actor: &Actor, request: &ActionRequest) -> Step<ActionResult> {
        let kind = request.kind;
        authorize_reviewer(actor, kind, "create announcements")?;
        let title = required(request, &["title"])?;
        let content = required(request, &["content", "body", "message"])?;
        let priority = match request.param("priority") {
            Some(value) => parse_param::<AnnouncementPriority>(request, "priority", value)?,
            None => AnnouncementPriority::default(),
        };

        let created = self
            .store
            .insert_announcement(&NewAnnouncement {
                title: title.to_string(),
                content: content.to_string(),
                priority,
                created_by: actor.id.clone(),
            })
            .await
            .map_err(|e| store_failure(kind, "Failed to create announcement", &e))?;

        self.cache.invalidate(QueryKey::Announcements);
        Ok(ActionResult::success(kind, format!("Announcement \"{}\" published", created.title))
            .with_data(json!(created)))
    }

    async fn update_task(&self, actor: &Actor, request: &ActionRequest) -> Step<ActionResult> {
        let kind = request.kind;
        let id = required(request, &["id", "task_id"])?;
        let status = parse_param::<TaskStatus>(request, "status", required(request, &["status"])?)?;
        let owner_scope = self.policy.enforce_task_ownership.then_some(actor.id.as_str());

        let task = self
            .store
            .update_task_status(id, status, Utc::now(), owner_scope)
            .await
            .map_err(|e| match e {
                StorageError::Forbidden(_) => ActionResult::failure(
                    kind,
                    FailureKind::Unauthorized,
                    format!("Unauthorized: task {} is not assigned to you", id),
                ),
                StorageError::NotFound(_) => ActionResult::failure(
                    kind,
                    FailureKind::StoreFailure,
                    format!("Task {} not found", id),
                ),
                other => store_failure(kind, &format!("Failed to update task {}", id), &other),
            })?;

        self.cache.invalidate(QueryKey::Tasks);
        Ok(ActionResult::success(kind, format!("Task \"{}\" marked as {}", task.title, task.status))
            .with_data(json!(task)))
    }

    async fn create_task(&self, actor: &Actor, request: &ActionRequest) -> Step<ActionResult> {
        let kind = request.kind;
        let title = required(request, &["title"])?;
        let priority = match request.param("priority") {
            Some(value) => parse_param::<TaskPriority>(request, "priority", value)?,
            None => TaskPriority::default(),
        };
        let due_date = match request.param("due_date") {
            Some(value) => Some(parse_date(request, "due_date", value)?),
            None => None,
        };
        let assignee = request.param_any(&["assigned_to", "assignee"]).unwrap_or(&actor.id);

        let created = self
            .store
            .insert_task(&NewTask {
                title: title.to_string(),
                description: request.param("description").map(str::to_string),
                priority,
                assigned_to: assignee.to_string(),
                created_by: actor.id.clone(),
                due_date,
            })
            .await
            .map_err(|e| store_failure(kind, "Failed to create task", &e))?;

        self.cache.invalidate(QueryKey::Tasks);
        Ok(ActionResult::success(kind, format!("Task \"{}\" created", created.title))
            .with_data(json!(created)))
    }

    fn navigate(&self, actor: &Actor, request: &ActionRequest) -> Step<ActionResult> {
        let kind = request.kind;
        let route = required(request, &["route", "path", "page"])?;

        match self.navigation.navigate(route, actor.role) {
            Ok(resolved) => Ok(ActionResult::success(kind, format!("Opened {}", resolved.name))
                .with_data(json!(resolved))),
            Err(err @ NavigationError::Unresolved { .. }) => {
                Err(ActionResult::failure(kind, FailureKind::UnresolvedRoute, err.to_string()))
            }
            Err(err @ NavigationError::Forbidden { .. }) => {
                Err(ActionResult::failure(kind, FailureKind::Unauthorized, err.to_string()))
            }
        }
    }
}

#[async_trait]
impl ActionHandler for DomainActionExecutor {
    async fn handle(&self, actor: &Actor, request: &ActionRequest) -> ActionResult {
        self.execute(actor, request).await
    }
}
