//! Locates JSON objects embedded in free-form text.
//!
//! Used by the structured detectors and by the display sanitizer, so both
//! agree on exactly which substrings are control payload.

use serde_json::{Map, Value};

/// Deepest brace nesting searched for an object inside a region that does
/// not parse. Matches the recursion limit of `serde_json`.
const MAX_SEARCH_DEPTH: usize = 128;

/// A balanced `{ ... }` region of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

/// Every balanced brace region, ordered by opening brace.
///
/// One pass with an explicit stack. Quotes only open a string inside a
/// region, so prose apostrophes and quotes are not string delimiters.
/// Braces that are never closed are ignored.
fn brace_spans(text: &str) -> Vec<Span> {
    let mut open = Vec::new();
    let mut spans = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(offset),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push(Span { start, end: offset + 1 });
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|span| span.start);
    spans
}

/// Links each span to the spans directly inside it.
///
/// Returns the outermost spans and, per span, the indexes of its children.
/// `spans` must be ordered by start; balanced spans never partially overlap.
fn nest(spans: &[Span]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut roots = Vec::new();
    let mut children = vec![Vec::new(); spans.len()];
    let mut enclosing: Vec<usize> = Vec::new();

    for (index, span) in spans.iter().enumerate() {
        while enclosing.last().is_some_and(|&parent| spans[parent].end <= span.start) {
            enclosing.pop();
        }
        match enclosing.last() {
            Some(&parent) => children[parent].push(index),
            None => roots.push(index),
        }
        enclosing.push(index);
    }
    (roots, children)
}

/// Outermost balanced brace regions, left to right.
pub(crate) fn balanced_spans(text: &str) -> Vec<Span> {
    let spans = brace_spans(text);
    let (roots, _) = nest(&spans);
    roots.into_iter().map(|index| spans[index]).collect()
}

/// Every JSON object that parses, with its span, left to right.
///
/// When a balanced region fails to parse, the regions directly inside it
/// are tried instead, so a well-formed object wrapped in broken JSON is
/// still found. The search stops `MAX_SEARCH_DEPTH` levels down.
pub(crate) fn json_objects(text: &str) -> Vec<(Span, Map<String, Value>)> {
    let spans = brace_spans(text);
    let (roots, children) = nest(&spans);

    let mut found = Vec::new();
    let mut pending: Vec<(usize, usize)> = roots.into_iter().rev().map(|index| (index, 0)).collect();

    while let Some((index, depth)) = pending.pop() {
        let span = spans[index];
        match serde_json::from_str::<Value>(&text[span.start..span.end]) {
            Ok(Value::Object(map)) => found.push((span, map)),
            _ if depth < MAX_SEARCH_DEPTH => {
                pending.extend(children[index].iter().rev().map(|&child| (child, depth + 1)));
            }
            _ => {}
        }
    }
    found
}
