//! Tasks command implementation.

use anyhow::Result;
use colored::Colorize;
use peoplehub_core::{AppConfig, DataStore, TaskFilter};
use tabled::{Table, Tabled, settings::Style};

use super::{TasksCommand, open_store, print_json};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Due")]
    due: String,
}

/// Execute a tasks command.
pub async fn execute(config: &AppConfig, command: TasksCommand, json_output: bool) -> Result<()> {
    match command {
        TasksCommand::List { user, status, open, limit } => {
            let filter = TaskFilter { assigned_to: user, status, open_only: open, limit };
            list(config, &filter, json_output).await
        }
    }
}

async fn list(config: &AppConfig, filter: &TaskFilter, json_output: bool) -> Result<()> {
    let store = open_store(config)?;
    let tasks = store.list_tasks(filter).await?;

    if json_output {
        return print_json(&tasks);
    }
    if tasks.is_empty() {
        println!("{}", "No tasks".yellow());
        return Ok(());
    }

    let rows: Vec<TaskRow> = tasks
        .into_iter()
        .map(|t| TaskRow {
            id: t.id,
            title: t.title,
            status: t.status.to_string(),
            priority: t.priority.to_string(),
            assignee: t.assigned_to,
            due: t.due_date.map_or_else(|| "-".to_string(), |d| d.to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
