//! Init command implementation.
//!
//! Creates the database schema and optionally seeds demo data.

use anyhow::{Context, Result};
use colored::Colorize;
use peoplehub_core::{AppConfig, seed_demo_data};
use serde_json::json;

use super::{open_store, print_json};

/// Execute the init command.
pub async fn execute(config: &AppConfig, demo: bool, json_output: bool) -> Result<()> {
    let store = open_store(config)?;

    let seed = if demo {
        Some(seed_demo_data(store.as_ref()).await.context("Failed to seed demo data")?)
    } else {
        None
    };

    if json_output {
        return print_json(&json!({ "database": config.database.path, "seed": seed }));
    }

    println!("{} {}", "✓".green(), format!("Database ready at {}", config.database.path).bold());
    if let Some(seed) = seed {
        println!();
        println!("{}", "Demo users:".bold());
        println!("  hr        {}", seed.hr_id.cyan());
        println!("  manager   {}", seed.manager_id.cyan());
        println!("  employee  {}", seed.employee_id.cyan());
        println!();
        println!("  Pending leave request: {}", seed.pending_leave_id.yellow());
        println!("  Open task:             {}", seed.task_id.yellow());
    }
    Ok(())
}
