//! Display sanitizer.
//!
//! Strips control payload from assistant text so the chat shows prose only.
//! It runs on the same raw text the extractor saw; the displayed message is
//! never rebuilt from the action list.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::extractor::json_scan::{balanced_spans, json_objects};

static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([A-Za-z0-9_-]*)[^\n`]*\n?(.*?)```").expect("fence regex is valid")
});

static PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:(?:executing|running|action)[ \t]*:[ \t]*)+").expect("prefix regex is valid")
});

static RECEIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:approved|rejected)[ \t]+leave(?:[ \t]+request)?[ \t]+id[ \t]*[:#][ \t]*[0-9a-f][0-9a-f-]{6,}[0-9a-f]\b\.?",
    )
    .expect("receipt regex is valid")
});

static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("spaces regex is valid"));

static TRAILING_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("trailing space regex is valid"));

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank lines regex is valid"));

const ACTION_MARKER: &str = "\"action";

/// Removes fenced blocks tagged `json` or carrying an action field.
fn strip_fences(text: &str) -> String {
    FENCE_RE
        .replace_all(text, |caps: &Captures| {
            let lang = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            if lang.eq_ignore_ascii_case("json") || body.contains(ACTION_MARKER) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Removes inline objects with an `action`/`actions` key, and any balanced
/// brace region mentioning `"action` even if it does not parse.
fn strip_inline_objects(text: &str) -> String {
    let mut spans: Vec<(usize, usize)> = json_objects(text)
        .into_iter()
        .filter(|(_, object)| object.contains_key("action") || object.contains_key("actions"))
        .map(|(span, _)| (span.start, span.end))
        .collect();
    spans.extend(
        balanced_spans(text)
            .into_iter()
            .filter(|span| text[span.start..span.end].contains(ACTION_MARKER))
            .map(|span| (span.start, span.end)),
    );
    spans.sort_unstable();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in spans {
        if start < cursor {
            // Nested in a region already removed
            continue;
        }
        out.push_str(&text[cursor..start]);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Drops what is left of an unterminated action object: from its opening
/// brace to the end of the line.
fn strip_dangling_payload(text: &str) -> String {
    if !text.contains(ACTION_MARKER) {
        return text.to_string();
    }
    text.split_inclusive('\n')
        .map(|line| match line.find(ACTION_MARKER) {
            Some(marker) => {
                let cut = line[..marker].rfind('{').unwrap_or(marker);
                let ending = if line.ends_with('\n') { "\n" } else { "" };
                format!("{}{}", &line[..cut], ending)
            }
            None => line.to_string(),
        })
        .collect()
}

/// Strips control payload from `text` for display.
///
/// Idempotent: cleaning an already-clean string returns it unchanged.
/// Removing one payload can expose another (a receipt inside a receipt,
/// a prefix after a prefix), so passes repeat until the text is stable.
/// Every pass only removes text, which bounds the loop.
pub fn clean(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let text = strip_fences(text);
    let text = strip_inline_objects(&text);
    let text = strip_dangling_payload(&text);
    let text = RECEIPT_RE.replace_all(&text, "");
    let text = PREFIX_RE.replace_all(&text, "");
    let text = SPACES_RE.replace_all(&text, " ");
    let text = TRAILING_SPACE_RE.replace_all(&text, "");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_clause_removed() {
        assert_eq!(clean("Approved leave ID:4f9c1a2b-44. Done."), "Done.");
    }

    #[test]
    fn test_fenced_json_removed() {
        let text = "I'll approve that.\n\n```json\n{\"action\": \"approve_leave\", \"id\": \"4f9c1a2b-44\"}\n```\n\nAnything else?";
        assert_eq!(clean(text), "I'll approve that.\n\nAnything else?");
    }

    #[test]
    fn test_other_code_fences_kept() {
        let text = "Run this:\n```sh\nls -la\n```";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_inline_block_removed() {
        let text = r#"Sure {"action": "reject_leave", "id": "9b2e6c1d"} it is rejected."#;
        assert_eq!(clean(text), "Sure it is rejected.");
    }

    #[test]
    fn test_unrelated_json_kept() {
        let text = r#"Your balance is {"days": 12}."#;
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_malformed_and_unterminated_blocks_removed() {
        let broken = r#"Okay {"action": approve_leave, "id": 4f9c} done"#;
        assert!(!clean(broken).contains("\"action"));

        let dangling = "Working on it.\n{\"action\": \"approve_leave\", \"id\": \"4f9c1a2b\"\nThanks";
        assert_eq!(clean(dangling), "Working on it.\n\nThanks");
    }

    #[test]
    fn test_prefixes_and_blank_lines() {
        let text = "Executing: approval now\n\n\n\n\nAction: done";
        assert_eq!(clean(text), "approval now\n\ndone");
    }

    #[test]
    fn test_actions_document_removed() {
        let text = r#"{"actions":[{"function":"navigate","params":{"route":"payroll"}}]}"#;
        assert_eq!(clean(text), "");
    }

    #[test]
    fn test_stacked_prefixes_removed() {
        assert_eq!(clean("Executing: Action: approve it"), "approve it");
        assert_eq!(clean("Running:action:  executing : done"), "done");
    }

    #[test]
    fn test_nested_receipt_removed() {
        assert_eq!(clean("Approved leave ID:Approved leave ID:4f9c1a2b-44. 9c1a2b44. ok"), "ok");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Executing: done.\n```json\n{\"action\":\"approve_leave\",\"id\":\"4f9c1a2b\"}\n```\n\n\n\nApproved leave ID:4f9c1a2b-44. Bye  now.",
            "Executing: Action: approve it",
            "Approved leave ID:Approved leave ID:4f9c1a2b-44. 9c1a2b44. ok",
            "Action:\nExecuting: Running: x",
            "Say \"act{\"action\": \"navigate\"}ion\" twice",
            "``{\"action\": 1}`json\n{\"k\": 1}\n```",
            "Rejected leave request ID# Approved leave ID: 4f9c1a2b-44 9b2e6c1d-77aa. fine",
            "{ {\"action\": \"x\"} }}} {{ Action: \"action",
            "  \n\n\n  Running:   \n\n\n",
        ];
        for sample in samples {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not stable for {sample:?}");
            assert!(!once.contains("\"action\""), "payload left in {once:?}");
        }
    }

    #[test]
    fn test_pathological_input_returns() {
        let depth = 20_000;
        let nested = format!("Hi {}{}", "{".repeat(depth), "}".repeat(depth));
        assert!(clean(&nested).starts_with("Hi"));

        let payload = format!("ok {}\"action\": 1{}", "{".repeat(depth), "}".repeat(depth));
        assert_eq!(clean(&payload), "ok");

        let receipts = "Approved leave ID:".repeat(200) + &"4f9c1a2b-44. ".repeat(200) + "end";
        assert_eq!(clean(&receipts), "end");
    }
}
