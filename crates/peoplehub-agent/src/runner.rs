// Concurrent action runner
//
// Every action runs as its own spawned task, bounded by an optional
// semaphore and a per-action timeout. Results come back in input order no
// matter which action finishes first. A panic, a timeout or a closed
// semaphore each turn into a failed `ActionResult` for that action only.

use futures::future::join_all;
use peoplehub_core::{Actor, AssistantConfig};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{Duration, timeout};
use tracing::{debug, info, warn};

use crate::action::{ActionRequest, ActionResult, ExecutedAction, FailureKind};
use crate::executor::ActionHandler;

/// Default upper bound on one action's execution.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Runner limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Upper bound on one action's execution.
    pub timeout_per_action: Duration,
    /// Maximum actions in flight; `None` runs everything at once.
    pub max_parallel: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { timeout_per_action: DEFAULT_ACTION_TIMEOUT, max_parallel: None }
    }
}

impl From<&AssistantConfig> for RunnerConfig {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            timeout_per_action: config.timeout_per_action(),
            max_parallel: config.max_parallel(),
        }
    }
}

/// Fans actions out to an [`ActionHandler`] and collects one result each.
#[derive(Clone)]
pub struct ActionRunner {
    handler: Arc<dyn ActionHandler>,
    config: RunnerConfig,
}

impl ActionRunner {
    /// Creates a runner with default limits.
    pub fn new(handler: Arc<dyn ActionHandler>) -> Self {
        Self { handler, config: RunnerConfig::default() }
    }

    /// Replaces the limits.
    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active limits.
    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Executes every action for `actor` and waits for all of them.
    ///
    /// Returns one [`ExecutedAction`] per input, in input order. Spawned
    /// actions keep running to completion even if this future is dropped.
    pub async fn run(&self, actor: &Actor, actions: Vec<ActionRequest>) -> Vec<ExecutedAction> {
        if actions.is_empty() {
            return Vec::new();
        }

        let permits = self.config.max_parallel.unwrap_or(actions.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(permits));
        let timeout_duration = self.config.timeout_per_action;
        debug!(actor_id = %actor.id, count = actions.len(), permits, "Dispatching actions");

        let handles: Vec<_> = actions
            .iter()
            .cloned()
            .map(|request| {
                let handler = Arc::clone(&self.handler);
                let semaphore = Arc::clone(&semaphore);
                let actor = actor.clone();

                tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire().await else {
                        return ActionResult::failure(
                            request.kind,
                            FailureKind::Aborted,
                            format!("{} was cancelled before it started", request.kind),
                        );
                    };

                    match timeout(timeout_duration, handler.handle(&actor, &request)).await {
                        Ok(result) => result,
                        Err(_) => ActionResult::failure(
                            request.kind,
                            FailureKind::Timeout,
                            format!("{} timed out after {:?}", request.kind, timeout_duration),
                        ),
                    }
                })
            })
            .collect();

        let joined = join_all(handles).await;

        let executed: Vec<ExecutedAction> = actions
            .into_iter()
            .zip(joined)
            .map(|(request, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    warn!(kind = %request.kind, "Action task failed: {}", e);
                    ActionResult::failure(
                        request.kind,
                        FailureKind::Aborted,
                        format!("{} aborted unexpectedly", request.kind),
                    )
                });
                ExecutedAction { request, result }
            })
            .collect();

        let succeeded = executed.iter().filter(|e| e.result.success).count();
        info!(
            actor_id = %actor.id,
            succeeded,
            failed = executed.len() - succeeded,
            "Actions completed"
        );
        executed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use async_trait::async_trait;
    use peoplehub_core::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    /// Sleeps for the `delay_ms` param, panics on `panic`, fails on `fail`.
    #[derive(Default)]
    struct ScriptedHandler {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ActionHandler for ScriptedHandler {
        async fn handle(&self, _actor: &Actor, request: &ActionRequest) -> ActionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = request.param("delay_ms").and_then(|d| d.parse().ok()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            assert!(request.param("panic").is_none(), "scripted panic");
            if request.param("fail").is_some() {
                ActionResult::failure(request.kind, FailureKind::Unauthorized, "nope")
            } else {
                ActionResult::success(request.kind, "ok")
            }
        }
    }

    fn actor() -> Actor {
        Actor::new("a0000000-0000-4000-8000-000000000002", Role::Manager)
    }

    fn action(delay_ms: u64) -> ActionRequest {
        ActionRequest::new(ActionKind::CreateTask).with_param("delay_ms", delay_ms.to_string())
    }

    #[tokio::test]
    async fn test_empty_input_skips_handler() {
        let handler = Arc::new(ScriptedHandler::default());
        let runner = ActionRunner::new(handler.clone());

        assert!(runner.run(&actor(), Vec::new()).await.is_empty());
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let runner = ActionRunner::new(Arc::new(ScriptedHandler::default()));
        let actions = vec![action(60), action(0), action(30)];

        let executed = runner.run(&actor(), actions.clone()).await;
        let requests: Vec<_> = executed.iter().map(|e| e.request.clone()).collect();
        assert_eq!(requests, actions);
    }

    #[tokio::test]
    async fn test_concurrent_not_sequential() {
        let runner = ActionRunner::new(Arc::new(ScriptedHandler::default()));
        let actions = vec![action(100), action(100), action(100)];

        let start = Instant::now();
        let executed = runner.run(&actor(), actions).await;
        let elapsed = start.elapsed();

        assert_eq!(executed.len(), 3);
        assert!(executed.iter().all(|e| e.result.success));
        // Sequential execution would take at least 300ms
        assert!(elapsed < Duration::from_millis(250), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_failure_and_panic_isolated() {
        let runner = ActionRunner::new(Arc::new(ScriptedHandler::default()));
        let actions = vec![
            action(10),
            action(10).with_param("fail", "1"),
            action(10).with_param("panic", "1"),
            action(10),
        ];

        let executed = runner.run(&actor(), actions).await;
        let outcomes: Vec<_> = executed.iter().map(|e| (e.result.success, e.result.failure)).collect();
        assert_eq!(outcomes, vec![
            (true, None),
            (false, Some(FailureKind::Unauthorized)),
            (false, Some(FailureKind::Aborted)),
            (true, None),
        ]);
    }

    #[tokio::test]
    async fn test_timeout_yields_timeout_failure() {
        let runner = ActionRunner::new(Arc::new(ScriptedHandler::default())).with_config(RunnerConfig {
            timeout_per_action: Duration::from_millis(50),
            max_parallel: None,
        });

        let executed = runner.run(&actor(), vec![action(500), action(0)]).await;
        assert_eq!(executed[0].result.failure, Some(FailureKind::Timeout));
        assert!(executed[1].result.success);
    }

    #[tokio::test]
    async fn test_max_parallel_bounds_in_flight() {
        let handler = Arc::new(ScriptedHandler::default());
        let runner = ActionRunner::new(handler.clone())
            .with_config(RunnerConfig { max_parallel: Some(2), ..RunnerConfig::default() });

        let executed = runner.run(&actor(), (0..6).map(|_| action(20)).collect()).await;
        assert_eq!(executed.len(), 6);
        assert!(handler.peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_config_from_assistant_settings() {
        let settings = AssistantConfig { timeout_per_action_ms: 1500, max_parallel: 3, ..AssistantConfig::default() };
        let config = RunnerConfig::from(&settings);
        assert_eq!(config.timeout_per_action, Duration::from_millis(1500));
        assert_eq!(config.max_parallel, Some(3));
    }
}
