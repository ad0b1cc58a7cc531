//! PeopleHub CLI - command-line access to the HR assistant pipeline
//!
//! The `phub` binary manages the local SQLite store and runs assistant text
//! through the same extract, execute and sanitize pipeline the dashboard
//! uses.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{LeaveCommand, TasksCommand, apply, extract, init, leave, routes, tasks, users};

/// PeopleHub CLI - HR dashboard assistant tooling
#[derive(Parser, Debug)]
#[command(
    name = "phub",
    author,
    version,
    about = "PeopleHub - HR dashboard assistant tooling",
    long_about = "PeopleHub (phub) manages the local HR data store and runs assistant replies through the action pipeline.\nActions are authorized against the acting user's stored role, never against the text."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Config file (defaults to ./.peoplehub.toml, then ~/.peoplehub/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides config and PEOPLEHUB_DATABASE)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database schema
    ///
    /// Opens (or creates) the configured database and optionally fills an
    /// empty store with one user per role plus sample records.
    Init {
        /// Seed demo users and records
        #[arg(long)]
        demo: bool,
    },

    /// List user profiles
    Users,

    /// List the pages a user may open
    Routes {
        /// Profile ID of the user
        #[arg(short, long)]
        user: String,
    },

    /// Dry run: show the actions found in assistant text and the cleaned reply
    ///
    /// Reads the text from stdin when it is not given as an argument.
    Extract {
        /// Assistant text
        text: Option<String>,
    },

    /// Run assistant text through the pipeline as a user
    ///
    /// Every extracted action is authorized against the user's stored role
    /// and executed concurrently. Reads the text from stdin when it is not
    /// given as an argument.
    Apply {
        /// Profile ID of the acting user
        #[arg(short, long)]
        user: String,

        /// Assistant text
        text: Option<String>,
    },

    /// Leave request commands
    #[command(subcommand)]
    Leave(LeaveCommand),

    /// Task commands
    #[command(subcommand)]
    Tasks(TasksCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    // Extraction never touches storage, so config is loaded per command
    let load = || config::load_config(args.config.as_deref(), args.database.clone());

    match command {
        Command::Extract { text } => extract::execute(text, args.json)?,
        Command::Init { demo } => init::execute(&load()?, demo, args.json).await?,
        Command::Users => users::execute(&load()?, args.json).await?,
        Command::Routes { user } => routes::execute(&load()?, &user, args.json).await?,
        Command::Apply { user, text } => apply::execute(&load()?, &user, text, args.json).await?,
        Command::Leave(cmd) => leave::execute(&load()?, cmd, args.json).await?,
        Command::Tasks(cmd) => tasks::execute(&load()?, cmd, args.json).await?,
    }

    Ok(())
}
