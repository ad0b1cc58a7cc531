//! Demo data for local runs of the `phub` CLI.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{
    AnnouncementPriority, NewAnnouncement, NewLeaveRequest, NewTask, Profile, Role, TaskPriority,
};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::DataStore;

/// Fixed profile ID of the seeded HR user.
pub const DEMO_HR_ID: &str = "0f1e2d3c-0000-4000-8000-0000000000a1";
/// Fixed profile ID of the seeded manager.
pub const DEMO_MANAGER_ID: &str = "0f1e2d3c-0000-4000-8000-0000000000b2";
/// Fixed profile ID of the seeded employee.
pub const DEMO_EMPLOYEE_ID: &str = "0f1e2d3c-0000-4000-8000-0000000000c3";

/// IDs of the rows created by [`seed_demo_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSeed {
    pub hr_id: String,
    pub manager_id: String,
    pub employee_id: String,
    /// A pending leave request made by the employee.
    pub pending_leave_id: String,
    /// A task assigned to the employee by the manager.
    pub task_id: String,
    pub announcement_id: String,
}

/// Populates an empty store with one user per role and a few records.
///
/// # Errors
/// * `StorageError::InvalidData` - If the store already holds profiles
pub async fn seed_demo_data(store: &dyn DataStore) -> StorageResult<DemoSeed> {
    if !store.list_profiles().await?.is_empty() {
        return Err(StorageError::InvalidData("store already contains profiles".to_string()));
    }

    let people = [
        (DEMO_HR_ID, "Hana Ruiz", "hana.ruiz@peoplehub.test", Role::Hr, "People Ops"),
        (DEMO_MANAGER_ID, "Marcus Lee", "marcus.lee@peoplehub.test", Role::Manager, "Engineering"),
        (DEMO_EMPLOYEE_ID, "Elif Demir", "elif.demir@peoplehub.test", Role::Employee, "Engineering"),
    ];
    for (id, name, email, role, department) in people {
        store
            .insert_profile(&Profile {
                id: id.to_string(),
                full_name: name.to_string(),
                email: email.to_string(),
                role,
                department: Some(department.to_string()),
            })
            .await?;
    }

    let today = Utc::now().date_naive();
    let leave = store
        .insert_leave_request(&NewLeaveRequest {
            user_id: DEMO_EMPLOYEE_ID.to_string(),
            leave_type: "annual".to_string(),
            start_date: today + Duration::days(14),
            end_date: today + Duration::days(18),
            reason: Some("Family visit".to_string()),
        })
        .await?;

    let task = store
        .insert_task(&NewTask {
            title: "Complete security training".to_string(),
            description: Some("Annual compliance module".to_string()),
            priority: TaskPriority::High,
            assigned_to: DEMO_EMPLOYEE_ID.to_string(),
            created_by: DEMO_MANAGER_ID.to_string(),
            due_date: Some(today + Duration::days(7)),
        })
        .await?;

    let announcement = store
        .insert_announcement(&NewAnnouncement {
            title: "Benefits enrollment open".to_string(),
            content: "Review your benefits selections before the end of the month.".to_string(),
            priority: AnnouncementPriority::Normal,
            created_by: DEMO_HR_ID.to_string(),
        })
        .await?;

    info!(profiles = people.len(), "Seeded demo data");

    Ok(DemoSeed {
        hr_id: DEMO_HR_ID.to_string(),
        manager_id: DEMO_MANAGER_ID.to_string(),
        employee_id: DEMO_EMPLOYEE_ID.to_string(),
        pending_leave_id: leave.id,
        task_id: task.id,
        announcement_id: announcement.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;
    use crate::storage::SqliteStore;

    #[tokio::test]
    async fn test_seed_creates_one_user_per_role() {
        let store = SqliteStore::open_in_memory().unwrap();
        let seed = seed_demo_data(&store).await.unwrap();

        let roles: Vec<Role> = store.list_profiles().await.unwrap().iter().map(|p| p.role).collect();
        for role in Role::ALL {
            assert!(roles.contains(&role), "missing {role}");
        }

        let leave = store.get_leave_request(&seed.pending_leave_id).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.user_id, seed.employee_id);
    }

    #[tokio::test]
    async fn test_seed_refuses_populated_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed_demo_data(&store).await.unwrap();
        assert!(matches!(seed_demo_data(&store).await, Err(StorageError::InvalidData(_))));
    }
}
