//! Extract command implementation.
//!
//! Dry run of the pipeline front half: nothing is executed.

use anyhow::Result;
use colored::Colorize;
use peoplehub_agent::{ActionExtractor, sanitizer};
use serde_json::json;

use super::{print_json, text_or_stdin};

/// Execute the extract command.
pub fn execute(text: Option<String>, json_output: bool) -> Result<()> {
    let raw = text_or_stdin(text)?;
    let actions = ActionExtractor::new().extract(&raw);
    let message = sanitizer::clean(&raw);

    if json_output {
        return print_json(&json!({ "actions": actions, "message": message }));
    }

    if actions.is_empty() {
        println!("{}", "No actions found".yellow());
    } else {
        println!("{}", format!("Actions ({}):", actions.len()).bold());
        for action in &actions {
            let params: Vec<String> = action
                .params
                .iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
                .collect();
            println!("  {} {}", action.kind.to_string().cyan(), params.join(" ").dimmed());
        }
    }
    println!();
    println!("{}", "Message:".bold());
    println!("{}", message);
    Ok(())
}
