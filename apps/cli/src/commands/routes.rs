//! Routes command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use peoplehub_agent::{ResolvedRoute, RouteTable};
use peoplehub_core::{AppConfig, DataStore};

use super::{open_store, print_json};

/// Execute the routes command.
///
/// Lists the dashboard pages the user's stored role may open.
pub async fn execute(config: &AppConfig, user: &str, json_output: bool) -> Result<()> {
    let store = open_store(config)?;
    let actor = store.get_actor(user).await.with_context(|| format!("Unknown user {}", user))?;
    let routes: Vec<ResolvedRoute> =
        RouteTable.accessible(actor.role).into_iter().map(ResolvedRoute::from).collect();

    if json_output {
        return print_json(&routes);
    }

    println!("{}", format!("Pages for the {} role:", actor.role).bold());
    for route in routes {
        println!("  {:<15} {}", route.name.cyan(), route.path.dimmed());
    }
    Ok(())
}
