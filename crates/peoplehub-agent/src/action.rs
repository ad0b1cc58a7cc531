//! Shared action vocabulary.
//!
//! The extractor produces [`ActionRequest`]s and the executor consumes them;
//! neither side depends on the other's internals, only on the types here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// The closed set of actions the assistant may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ApproveLeave,
    RejectLeave,
    CreateAnnouncement,
    UpdateTask,
    CreateTask,
    SubmitLeave,
    Navigate,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::ApproveLeave,
        Self::RejectLeave,
        Self::CreateAnnouncement,
        Self::UpdateTask,
        Self::CreateTask,
        Self::SubmitLeave,
        Self::Navigate,
    ];

    /// Returns the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApproveLeave => "approve_leave",
            Self::RejectLeave => "reject_leave",
            Self::CreateAnnouncement => "create_announcement",
            Self::UpdateTask => "update_task",
            Self::CreateTask => "create_task",
            Self::SubmitLeave => "submit_leave",
            Self::Navigate => "navigate",
        }
    }

    /// Parses a wire name. Unknown names yield `None`.
    ///
    /// Case, surrounding whitespace and dash/space separators are ignored,
    /// so `"Approve-Leave"` parses as [`ActionKind::ApproveLeave`].
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|kind| kind.as_str() == normalized)
    }

    /// The parameter that identifies the action's target, if any.
    pub fn target_param(self) -> Option<&'static str> {
        match self {
            Self::ApproveLeave | Self::RejectLeave | Self::UpdateTask => Some("id"),
            Self::Navigate => Some("route"),
            Self::CreateAnnouncement | Self::CreateTask => Some("title"),
            Self::SubmitLeave => None,
        }
    }

    /// Whether the target parameter must be a record identifier.
    pub fn targets_record(self) -> bool {
        matches!(self, Self::ApproveLeave | Self::RejectLeave | Self::UpdateTask)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `value` looks like a record identifier.
///
/// Identifiers are at least 8 characters of hex digits and dashes, and do not
/// start or end with a dash.
pub fn is_record_id(value: &str) -> bool {
    value.len() >= 8
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// A typed, not-yet-validated intent extracted from assistant text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Requested action.
    pub kind: ActionKind,
    /// String parameters; `None` for explicit JSON nulls.
    #[serde(default)]
    pub params: BTreeMap<String, Option<String>>,
}

impl ActionRequest {
    /// Creates a request without parameters.
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, params: BTreeMap::new() }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), Some(value.into()));
        self
    }

    /// Builds a request from a JSON parameter object.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified, nulls
    /// become `None` and nested values are kept as compact JSON text.
    pub fn from_json_params(kind: ActionKind, params: &Map<String, Value>) -> Self {
        let params = params
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                };
                (key.clone(), value)
            })
            .collect();
        Self { kind, params }
    }

    /// Returns a trimmed, non-empty parameter value.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Returns the first present parameter among `keys`.
    pub fn param_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.param(key))
    }

    /// The `(kind, target)` pair used to drop duplicate declarations.
    ///
    /// Targets compare case-insensitively. `submit_leave` is keyed by its
    /// date range.
    pub fn dedup_key(&self) -> (ActionKind, String) {
        let target = match self.kind.target_param() {
            Some(key) => self.param(key).unwrap_or_default().to_lowercase(),
            None => format!(
                "{}..{}",
                self.param("start_date").unwrap_or_default(),
                self.param("end_date").unwrap_or_default()
            ),
        };
        (self.kind, target)
    }
}

/// Classification of a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The actor's role may not perform the action.
    Unauthorized,
    /// A required parameter was missing or unparsable.
    InvalidParams,
    /// Navigation target could not be resolved.
    UnresolvedRoute,
    /// The data store rejected or failed the operation.
    StoreFailure,
    /// Execution exceeded the per-action timeout.
    Timeout,
    /// Execution panicked or was cancelled.
    Aborted,
}

/// The outcome of one [`ActionRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action succeeded (including no-op successes).
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Echo of the request kind.
    pub kind: ActionKind,
    /// Optional payload, e.g. the created record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Set on failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl ActionResult {
    /// Create a successful result
    pub fn success(kind: ActionKind, message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), kind, data: None, failure: None }
    }

    /// Create a failed result
    pub fn failure(kind: ActionKind, failure: FailureKind, message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), kind, data: None, failure: Some(failure) }
    }

    /// Attach a payload
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether this is a success that changed nothing.
    pub fn is_noop(&self) -> bool {
        self.success
            && self.data.as_ref().and_then(|d| d.get("changed")).and_then(Value::as_bool)
                == Some(false)
    }
}

/// A request paired with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedAction {
    pub request: ActionRequest,
    pub result: ActionResult,
}
