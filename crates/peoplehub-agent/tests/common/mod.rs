//! Shared helpers for the action pipeline integration tests.
//!
//! Builds a seeded in-memory store and a fully wired pipeline so individual
//! tests only describe the assistant text and the expected outcome.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use peoplehub_agent::{
    ActionPipeline, ActionRunner, BroadcastNotifier, DomainActionExecutor, ExecutorPolicy,
    HistoryNavigator, NavigationResolver, RunnerConfig, UiEvent,
};
use peoplehub_core::{
    Actor, Announcement, DataStore, Database, DemoSeed, LeaveDecision, LeaveFilter, LeaveRequest,
    NewAnnouncement, NewLeaveRequest, NewTask, Profile, Role, SqliteStore, StorageResult, Task,
    TaskFilter, TaskStatus, seed_demo_data,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

/// Leave request ID used by the receipt-style scenarios.
pub const RECEIPT_LEAVE_ID: &str = "4f9c1a2b-44";

/// A wired pipeline over a seeded store.
pub struct TestHarness {
    pub store: Arc<SqliteStore>,
    pub seed: DemoSeed,
    pub pipeline: ActionPipeline,
    pub navigator: Arc<HistoryNavigator>,
    pub events: Receiver<UiEvent>,
}

impl TestHarness {
    pub fn hr(&self) -> Actor {
        Actor::new(&self.seed.hr_id, Role::Hr)
    }

    pub fn manager(&self) -> Actor {
        Actor::new(&self.seed.manager_id, Role::Manager)
    }

    pub fn employee(&self) -> Actor {
        Actor::new(&self.seed.employee_id, Role::Employee)
    }

    /// UI events published so far.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }
}

/// Opens an in-memory store with the demo data plus a pending leave request
/// whose ID is [`RECEIPT_LEAVE_ID`].
pub async fn seeded_store() -> (Arc<SqliteStore>, DemoSeed) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let store = Arc::new(SqliteStore::new(db));
    let seed = seed_demo_data(store.as_ref()).await.expect("Failed to seed demo data");

    store
        .insert_leave_request_with_id(
            RECEIPT_LEAVE_ID,
            &NewLeaveRequest {
                user_id: seed.employee_id.clone(),
                leave_type: "sick".to_string(),
                start_date: chrono::NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                end_date: chrono::NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
                reason: Some("Flu".to_string()),
            },
        )
        .await
        .expect("Failed to insert receipt leave request");

    (store, seed)
}

/// Builds a harness with the given executor policy and default runner limits.
pub async fn harness(policy: ExecutorPolicy) -> TestHarness {
    let (store, seed) = seeded_store().await;
    harness_over(store.clone(), store, seed, policy, RunnerConfig::default())
}

/// Builds a harness whose executor talks to `backend` instead of `store`.
///
/// `store` stays available for assertions that bypass the backend.
pub fn harness_over(
    store: Arc<SqliteStore>,
    backend: Arc<dyn DataStore>,
    seed: DemoSeed,
    policy: ExecutorPolicy,
    runner: RunnerConfig,
) -> TestHarness {
    let notifier = Arc::new(BroadcastNotifier::new(64));
    let navigator = Arc::new(HistoryNavigator::new());
    let executor = DomainActionExecutor::new(
        backend,
        NavigationResolver::new(navigator.clone()),
        notifier.clone(),
        notifier.clone(),
    )
    .with_policy(policy);
    let pipeline = ActionPipeline::new(ActionRunner::new(Arc::new(executor)).with_config(runner));

    TestHarness { store, seed, pipeline, navigator, events: notifier.subscribe() }
}

/// Delays every call before delegating to the wrapped store.
pub struct SlowStore {
    inner: Arc<dyn DataStore>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: Arc<dyn DataStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }

    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl DataStore for SlowStore {
    async fn insert_profile(&self, profile: &Profile) -> StorageResult<()> {
        self.pause().await;
        self.inner.insert_profile(profile).await
    }

    async fn get_profile(&self, id: &str) -> StorageResult<Profile> {
        self.pause().await;
        self.inner.get_profile(id).await
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        self.pause().await;
        self.inner.list_profiles().await
    }

    async fn insert_leave_request(&self, input: &NewLeaveRequest) -> StorageResult<LeaveRequest> {
        self.pause().await;
        self.inner.insert_leave_request(input).await
    }

    async fn get_leave_request(&self, id: &str) -> StorageResult<LeaveRequest> {
        self.pause().await;
        self.inner.get_leave_request(id).await
    }

    async fn resolve_leave_request(
        &self,
        id: &str,
        decision: LeaveDecision,
        reviewer_id: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StorageResult<usize> {
        self.pause().await;
        self.inner.resolve_leave_request(id, decision, reviewer_id, reviewed_at).await
    }

    async fn list_leave_requests(&self, filter: &LeaveFilter) -> StorageResult<Vec<LeaveRequest>> {
        self.pause().await;
        self.inner.list_leave_requests(filter).await
    }

    async fn insert_task(&self, input: &NewTask) -> StorageResult<Task> {
        self.pause().await;
        self.inner.insert_task(input).await
    }

    async fn get_task(&self, id: &str) -> StorageResult<Task> {
        self.pause().await;
        self.inner.get_task(id).await
    }

    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
        owner_scope: Option<&str>,
    ) -> StorageResult<Task> {
        self.pause().await;
        self.inner.update_task_status(id, status, updated_at, owner_scope).await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        self.pause().await;
        self.inner.list_tasks(filter).await
    }

    async fn insert_announcement(&self, input: &NewAnnouncement) -> StorageResult<Announcement> {
        self.pause().await;
        self.inner.insert_announcement(input).await
    }

    async fn list_announcements(&self, limit: usize) -> StorageResult<Vec<Announcement>> {
        self.pause().await;
        self.inner.list_announcements(limit).await
    }
}
