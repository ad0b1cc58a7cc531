//! Storage layer for PeopleHub.
//!
//! The assistant talks to storage only through the [`DataStore`] trait.
//! [`SqliteStore`] is the bundled implementation; its conditional updates are
//! what keeps leave review idempotent under concurrent approvals.

// SQL strings don't need hash-less raw strings
#![allow(clippy::needless_raw_string_hashes)]

pub mod database;
pub mod error;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use database::Database;
pub use error::{StorageError, StorageResult};
pub use seed::{DEMO_EMPLOYEE_ID, DEMO_HR_ID, DEMO_MANAGER_ID, DemoSeed, seed_demo_data};
pub use sqlite::SqliteStore;
pub use store::{ChangeType, DataStore, LeaveFilter, StoreEvent, TaskFilter};
