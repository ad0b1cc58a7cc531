//! Command type definitions shared between main.rs and the command modules.

use clap::Subcommand;
use peoplehub_core::{LeaveStatus, TaskStatus};

#[derive(Subcommand, Debug, Clone)]
pub enum LeaveCommand {
    /// List leave requests
    List {
        /// Only requests made by this profile ID
        #[arg(short, long)]
        user: Option<String>,

        /// Only requests in this state (pending, approved, rejected)
        #[arg(short, long)]
        status: Option<LeaveStatus>,

        /// Maximum rows to show
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TasksCommand {
    /// List tasks
    List {
        /// Only tasks assigned to this profile ID
        #[arg(short, long)]
        user: Option<String>,

        /// Only tasks in this state (pending, in_progress, completed)
        #[arg(short, long)]
        status: Option<TaskStatus>,

        /// Hide completed tasks
        #[arg(long)]
        open: bool,

        /// Maximum rows to show
        #[arg(long)]
        limit: Option<usize>,
    },
}
