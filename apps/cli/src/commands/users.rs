//! Users command implementation.

use anyhow::Result;
use peoplehub_core::{AppConfig, DataStore};
use tabled::{Table, Tabled, settings::Style};

use super::{open_store, print_json};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Department")]
    department: String,
}

/// Execute the users command.
pub async fn execute(config: &AppConfig, json_output: bool) -> Result<()> {
    let store = open_store(config)?;
    let profiles = store.list_profiles().await?;

    if json_output {
        return print_json(&profiles);
    }
    if profiles.is_empty() {
        println!("No users. Seed some with: phub init --demo");
        return Ok(());
    }

    let rows: Vec<UserRow> = profiles
        .into_iter()
        .map(|p| UserRow {
            id: p.id,
            name: p.full_name,
            email: p.email,
            role: p.role.to_string(),
            department: p.department.unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
