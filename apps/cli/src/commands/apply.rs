//! Apply command implementation.
//!
//! Runs assistant text through the full pipeline as a stored user.

use anyhow::{Context, Result};
use colored::Colorize;
use peoplehub_agent::{
    ActionPipeline, ActionRunner, DomainActionExecutor, ExecutorPolicy, NavigationResolver,
    RunnerConfig, TracingNotifier,
};
use peoplehub_core::{AppConfig, DataStore};
use std::sync::Arc;

use super::{open_store, print_json, text_or_stdin};

/// Execute the apply command.
pub async fn execute(
    config: &AppConfig,
    user: &str,
    text: Option<String>,
    json_output: bool,
) -> Result<()> {
    let raw = text_or_stdin(text)?;
    let store = open_store(config)?;
    let actor = store.get_actor(user).await.with_context(|| format!("Unknown user {}", user))?;

    // Headless: UI side effects become log lines
    let ui = Arc::new(TracingNotifier);
    let executor = DomainActionExecutor::new(store, NavigationResolver::new(ui.clone()), ui.clone(), ui)
        .with_policy(ExecutorPolicy {
            enforce_task_ownership: config.assistant.enforce_task_ownership,
        });
    let runner =
        ActionRunner::new(Arc::new(executor)).with_config(RunnerConfig::from(&config.assistant));
    let outcome = ActionPipeline::new(runner).apply(&actor, &raw).await;

    if json_output {
        return print_json(&outcome);
    }

    if !outcome.message.is_empty() {
        println!("{}", outcome.message);
        println!();
    }
    if outcome.actions.is_empty() {
        println!("{}", "No actions executed".dimmed());
    } else {
        for line in outcome.summary().lines() {
            if line.starts_with('✓') {
                println!("{}", line.green());
            } else {
                println!("{}", line.red());
            }
        }
    }
    Ok(())
}
