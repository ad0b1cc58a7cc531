// UI side-effect seams
//
// The executor never talks to a UI directly. It reports outcomes through a
// `Notifier`, asks a `QueryCache` to drop stale query groups, and moves the
// UI through a `Navigator`. `BroadcastNotifier` implements all three on top of
// one event channel so a front end can subscribe to a single stream.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::navigation::Navigator;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// Cached query groups a mutation can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKey {
    LeaveRequests,
    Tasks,
    Announcements,
}

impl QueryKey {
    /// Returns the query group name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeaveRequests => "leave_requests",
            Self::Tasks => "tasks",
            Self::Announcements => "announcements",
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    /// Surfaces `message` to the user. Must not block; failures are ignored.
    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Client-side query cache.
pub trait QueryCache: Send + Sync {
    /// Marks every query in `key`'s group as stale.
    fn invalidate(&self, key: QueryKey);
}

/// Events streamed to a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A toast should be shown.
    Notification { level: NotifyLevel, message: String },

    /// A query group is stale.
    InvalidateQuery { key: QueryKey },

    /// The UI should move to `path`.
    Navigate { path: String },
}

/// Publishes every side effect as a [`UiEvent`].
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<UiEvent>,
}

impl BroadcastNotifier {
    /// Creates a notifier with a bounded event buffer.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.sender.subscribe()
    }

    fn emit(&self, event: UiEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.emit(UiEvent::Notification { level, message: message.to_string() });
    }
}

impl QueryCache for BroadcastNotifier {
    fn invalidate(&self, key: QueryKey) {
        self.emit(UiEvent::InvalidateQuery { key });
    }
}

impl Navigator for BroadcastNotifier {
    fn navigate(&self, path: &str) {
        self.emit(UiEvent::Navigate { path: path.to_string() });
    }
}

/// Headless sink that writes side effects to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Error => warn!(level = %level, "{}", message),
            NotifyLevel::Success | NotifyLevel::Info => info!(level = %level, "{}", message),
        }
    }
}

impl QueryCache for TracingNotifier {
    fn invalidate(&self, key: QueryKey) {
        debug!(query = key.as_str(), "Invalidated query group");
    }
}

impl Navigator for TracingNotifier {
    fn navigate(&self, path: &str) {
        info!(path = %path, "Navigation requested");
    }
}
