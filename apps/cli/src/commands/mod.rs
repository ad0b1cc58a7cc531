//! Command implementations for the PeopleHub CLI.

pub mod apply;
pub mod extract;
pub mod init;
pub mod leave;
pub mod routes;
pub mod tasks;
pub mod types;
pub mod users;

pub use types::{LeaveCommand, TasksCommand};

use anyhow::{Context, Result};
use peoplehub_core::{AppConfig, SqliteStore};
use std::io::Read;
use std::sync::Arc;

/// Opens the configured database, creating the schema if needed.
pub fn open_store(config: &AppConfig) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database {}", config.database.path))?;
    Ok(Arc::new(store))
}

/// Returns `text`, or all of stdin when it is absent.
pub fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
