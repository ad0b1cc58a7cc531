//! Leave command implementation.

use anyhow::Result;
use colored::Colorize;
use peoplehub_core::{AppConfig, DataStore, LeaveFilter};
use tabled::{Table, Tabled, settings::Style};

use super::{LeaveCommand, open_store, print_json};

#[derive(Tabled)]
struct LeaveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Type")]
    leave_type: String,
    #[tabled(rename = "Dates")]
    dates: String,
    #[tabled(rename = "Days")]
    days: i64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reviewed by")]
    reviewed_by: String,
}

/// Execute a leave command.
pub async fn execute(config: &AppConfig, command: LeaveCommand, json_output: bool) -> Result<()> {
    match command {
        LeaveCommand::List { user, status, limit } => {
            let filter = LeaveFilter { user_id: user, status, limit };
            list(config, &filter, json_output).await
        }
    }
}

async fn list(config: &AppConfig, filter: &LeaveFilter, json_output: bool) -> Result<()> {
    let store = open_store(config)?;
    let requests = store.list_leave_requests(filter).await?;

    if json_output {
        return print_json(&requests);
    }
    if requests.is_empty() {
        println!("{}", "No leave requests".yellow());
        return Ok(());
    }

    let rows: Vec<LeaveRow> = requests
        .into_iter()
        .map(|r| LeaveRow {
            days: r.days(),
            dates: format!("{} → {}", r.start_date, r.end_date),
            id: r.id,
            user: r.user_id,
            leave_type: r.leave_type,
            status: r.status.to_string(),
            reviewed_by: r.reviewed_by.unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
