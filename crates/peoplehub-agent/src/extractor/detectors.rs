//! Built-in action detectors, in priority order.

use once_cell::sync::Lazy;
use peoplehub_core::TaskStatus;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::ActionDetector;
use super::json_scan::json_objects;
use crate::action::{ActionKind, ActionRequest};
use crate::navigation::RouteTable;

/// Verb followed, within the same sentence, by a hex-like identifier.
static LEAVE_DECISION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(approved|approving|rejected|rejecting)\b[^.!?\n]*?\b([0-9a-f][0-9a-f-]{6,}[0-9a-f])\b",
    )
    .expect("leave decision regex is valid")
});

static NEGATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:not|never|cannot|can't|won't|haven't|hasn't|didn't)\s+(?:\w+\s+)?$")
        .expect("negation regex is valid")
});

static NAVIGATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:opening|navigating\s+(?:you\s+)?to|showing(?:\s+(?:you|me|us))?|taking\s+you\s+to|redirecting\s+(?:you\s+)?to)\s+(?:the\s+|your\s+|my\s+)?|going\s+to\s+(?:the|your|my)\s+)([a-z][a-z-]*)(?:[\s_]+([a-z][a-z-]*))?",
    )
    .expect("navigation regex is valid")
});

static TASK_STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\btask\s+(?:id\s*:?\s*)?#?([0-9a-f][0-9a-f-]{6,}[0-9a-f])\b[^.!?\n]*?\b(?:marked|set|updated|moved|changed)\s+(?:as|to)\s+(completed?|done|in[\s_-]progress|pending)\b",
    )
    .expect("task status regex is valid")
});

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key)?.as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// The `{"actions": [{"function": ..., "params": {...}}]}` document.
///
/// This is the preferred machine-readable channel. Elements with an unknown
/// `function` or a non-object `params` are dropped.
#[derive(Debug, Default)]
pub struct ActionsDocumentDetector;

impl ActionDetector for ActionsDocumentDetector {
    fn name(&self) -> &'static str {
        "actions_document"
    }

    fn detect(&self, text: &str) -> Vec<ActionRequest> {
        let mut requests = Vec::new();
        for (_, object) in json_objects(text) {
            let Some(Value::Array(actions)) = object.get("actions") else {
                continue;
            };
            for entry in actions {
                let Some(entry) = entry.as_object() else {
                    continue;
                };
                let Some(function) = string_field(entry, "function") else {
                    debug!("Skipping action entry without function");
                    continue;
                };
                let Some(kind) = ActionKind::parse(function) else {
                    debug!(function = %function, "Dropping unknown action function");
                    continue;
                };
                let request = match entry.get("params") {
                    Some(Value::Object(params)) => ActionRequest::from_json_params(kind, params),
                    None | Some(Value::Null) => ActionRequest::new(kind),
                    Some(_) => {
                        debug!(kind = %kind, "Dropping action with non-object params");
                        continue;
                    }
                };
                requests.push(request);
            }
        }
        requests
    }
}

/// Flat `{"action": ..., "id": ...}` blocks.
///
/// Recognizes `approve_leave`/`reject_leave` with `id`, and
/// `create_announcement` with `title` and `content`.
#[derive(Debug, Default)]
pub struct StructuredBlockDetector;

impl ActionDetector for StructuredBlockDetector {
    fn name(&self) -> &'static str {
        "structured_block"
    }

    fn detect(&self, text: &str) -> Vec<ActionRequest> {
        json_objects(text)
            .into_iter()
            .filter_map(|(_, object)| {
                let kind = ActionKind::parse(string_field(&object, "action")?)?;
                match kind {
                    ActionKind::ApproveLeave | ActionKind::RejectLeave => {
                        let id = string_field(&object, "id")?;
                        Some(ActionRequest::new(kind).with_param("id", id))
                    }
                    ActionKind::CreateAnnouncement => {
                        let mut request = ActionRequest::new(kind)
                            .with_param("title", string_field(&object, "title")?)
                            .with_param("content", string_field(&object, "content")?);
                        if let Some(priority) = string_field(&object, "priority") {
                            request = request.with_param("priority", priority);
                        }
                        Some(request)
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

/// "Approved leave ID:4f9c1a2b-44" and similar sentences.
#[derive(Debug, Default)]
pub struct LeaveDecisionDetector;

impl ActionDetector for LeaveDecisionDetector {
    fn name(&self) -> &'static str {
        "leave_decision"
    }

    fn detect(&self, text: &str) -> Vec<ActionRequest> {
        LEAVE_DECISION_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let verb = caps.get(1)?;
                let id = caps.get(2)?.as_str();
                if NEGATION_RE.is_match(&text[..verb.start()]) {
                    debug!(id = %id, "Ignoring negated leave decision");
                    return None;
                }
                // Hex-only English words ("deadbeef", "effaced") carry no digit
                if !id.chars().any(|c| c.is_ascii_digit()) {
                    return None;
                }
                let kind = if verb.as_str().to_ascii_lowercase().starts_with("approv") {
                    ActionKind::ApproveLeave
                } else {
                    ActionKind::RejectLeave
                };
                Some(ActionRequest::new(kind).with_param("id", id))
            })
            .collect()
    }
}

/// "Opening the employees page", "taking you to payroll", ...
///
/// Only nouns that resolve through the route table produce a request.
/// "Going to" needs a determiner before the noun, since it usually
/// introduces a verb ("going to account for", "going to leave it").
#[derive(Debug, Default)]
pub struct NavigationPhraseDetector {
    routes: RouteTable,
}

impl NavigationPhraseDetector {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }
}

impl ActionDetector for NavigationPhraseDetector {
    fn name(&self) -> &'static str {
        "navigation_phrase"
    }

    fn detect(&self, text: &str) -> Vec<ActionRequest> {
        NAVIGATION_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let first = caps.get(1)?.as_str();
                let two_words = caps.get(2).map(|second| format!("{}-{}", first, second.as_str()));
                let route = two_words
                    .as_deref()
                    .and_then(|phrase| self.routes.lookup(phrase))
                    .or_else(|| self.routes.lookup(first))?;
                Some(ActionRequest::new(ActionKind::Navigate).with_param("route", route.name))
            })
            .collect()
    }
}

/// "Task 7c1e9a20 has been marked as completed".
#[derive(Debug, Default)]
pub struct TaskStatusDetector;

impl ActionDetector for TaskStatusDetector {
    fn name(&self) -> &'static str {
        "task_status"
    }

    fn detect(&self, text: &str) -> Vec<ActionRequest> {
        TASK_STATUS_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let id = caps.get(1)?.as_str();
                let status = caps.get(2)?.as_str().parse::<TaskStatus>().ok()?;
                Some(
                    ActionRequest::new(ActionKind::UpdateTask)
                        .with_param("id", id)
                        .with_param("status", status.as_str()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_document() {
        let text = r#"{"actions": [
            {"function": "approve_leave", "params": {"id": "4f9c1a2b-44"}},
            {"function": "launch_rockets", "params": {}},
            {"function": "navigate", "params": {"route": "payroll"}}
        ]}"#;
        let requests = ActionsDocumentDetector.detect(text);

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].kind, ActionKind::ApproveLeave);
        assert_eq!(requests[1].param("route"), Some("payroll"));
    }

    #[test]
    fn test_actions_document_in_fence() {
        let text = "Here you go:\n```json\n{\"actions\":[{\"function\":\"create_task\",\"params\":{\"title\":\"Badge\"}}]}\n```";
        let requests = ActionsDocumentDetector.detect(text);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("title"), Some("Badge"));
    }

    #[test]
    fn test_structured_block_announcement_requires_content() {
        let complete = r#"{"action": "create_announcement", "title": "Picnic", "content": "Friday at noon"}"#;
        let partial = r#"{"action": "create_announcement", "title": "Picnic"}"#;
        assert_eq!(StructuredBlockDetector.detect(complete).len(), 1);
        assert!(StructuredBlockDetector.detect(partial).is_empty());
    }

    #[test]
    fn test_leave_decision_sentence_scope() {
        let requests = LeaveDecisionDetector.detect("Approved leave ID:4f9c1a2b-44. Done.");
        assert_eq!(requests, vec![
            ActionRequest::new(ActionKind::ApproveLeave).with_param("id", "4f9c1a2b-44")
        ]);

        // The identifier belongs to another sentence
        assert!(LeaveDecisionDetector.detect("I approved it. Ref 4f9c1a2b-44").is_empty());
    }

    #[test]
    fn test_leave_decision_rejecting_and_negation() {
        let requests =
            LeaveDecisionDetector.detect("Rejecting request 9b2e6c1d-77aa because of overlap.");
        assert_eq!(requests[0].kind, ActionKind::RejectLeave);

        assert!(LeaveDecisionDetector.detect("I have not approved 9b2e6c1d-77aa yet.").is_empty());
    }

    #[test]
    fn test_leave_decision_ignores_words() {
        assert!(LeaveDecisionDetector.detect("Approved, with a defaced badge.").is_empty());
        assert!(LeaveDecisionDetector.detect("Approved leave 4f9c1a2.").is_empty());
    }

    #[test]
    fn test_navigation_phrases() {
        let detector = NavigationPhraseDetector::default();
        let routes = |text: &str| {
            detector
                .detect(text)
                .into_iter()
                .filter_map(|r| r.param("route").map(str::to_string))
                .collect::<Vec<_>>()
        };

        assert_eq!(routes("Opening the employee directory now."), vec!["employees"]);
        assert_eq!(routes("Taking you to home."), vec!["dashboard"]);
        assert_eq!(routes("Showing you your time off balance"), vec!["leave"]);
        assert_eq!(routes("Going to the payroll page."), vec!["payroll"]);
        assert!(routes("I'm going to review this later.").is_empty());
    }

    #[test]
    fn test_navigation_ignores_verbs() {
        let detector = NavigationPhraseDetector::default();
        for text in [
            "I'm going to update the task status for you.",
            "I'm going to report this to HR.",
            "I'm going to account for the overlap.",
            "I'm going to leave that request pending.",
            "Opening a new task for Marcus.",
            "Showing you how to update your profile.",
            "Taking you through the reports you asked about, one update at a time.",
        ] {
            assert!(detector.detect(text).is_empty(), "navigated on {text:?}");
        }
    }

    #[test]
    fn test_extract_tolerates_pathological_text() {
        let depth = 20_000;
        let nested = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        let chain = crate::extractor::ActionExtractor::new();
        assert!(chain.extract(&nested).is_empty());

        let unclosed = format!("Approved {}", "{\"action\": ".repeat(depth));
        assert!(chain.extract(&unclosed).is_empty());

        let long = "going to the ".repeat(10_000);
        assert!(chain.extract(&long).is_empty());
    }

    #[test]
    fn test_task_status_phrase() {
        let requests =
            TaskStatusDetector.detect("Task 7c1e9a20-5b has been marked as in progress.");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("id"), Some("7c1e9a20-5b"));
        assert_eq!(requests[0].param("status"), Some("in_progress"));
    }
}
