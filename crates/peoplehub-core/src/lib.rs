//! PeopleHub Core - domain model, storage and configuration for the HR
//! dashboard assistant.
//!
//! This crate provides:
//! - Domain records (profiles, leave requests, tasks, announcements)
//! - The [`DataStore`] contract and its SQLite implementation
//! - Configuration loading
//!
//! # Example
//!
//! ```rust,no_run
//! use peoplehub_core::{DataStore, SqliteStore};
//!
//! # async fn run() -> peoplehub_core::Result<()> {
//! let store = SqliteStore::open("peoplehub.db")?;
//! let actor = store.get_actor("0f1e2d3c-0000-4000-8000-0000000000b2").await?;
//! println!("{} is {}", actor.id, actor.role);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::{AppConfig, AssistantConfig, ConfigError, DatabaseConfig};
pub use error::{CoreError, Result};
pub use models::{
    Actor, Announcement, AnnouncementPriority, DomainError, LeaveDecision, LeaveRequest,
    LeaveStatus, NewAnnouncement, NewLeaveRequest, NewTask, Profile, Role, Task, TaskPriority,
    TaskStatus,
};
pub use storage::{
    ChangeType, DEMO_EMPLOYEE_ID, DEMO_HR_ID, DEMO_MANAGER_ID, DataStore, Database, DemoSeed,
    LeaveFilter, SqliteStore, StorageError, StorageResult, StoreEvent, TaskFilter,
    seed_demo_data,
};
