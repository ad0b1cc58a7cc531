//! SQLite implementation of [`DataStore`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Value as SqlValue};
use serde::Serialize;
use std::str::FromStr;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    Announcement, DomainError, LeaveDecision, LeaveRequest, LeaveStatus, NewAnnouncement,
    NewLeaveRequest, NewTask, Profile, Task, TaskStatus,
};
use crate::storage::database::Database;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::store::{ChangeType, DataStore, LeaveFilter, StoreEvent, TaskFilter};

const LEAVE_COLUMNS: &str = "id, user_id, leave_type, start_date, end_date, reason, status, reviewed_by, reviewed_at, created_at";
const TASK_COLUMNS: &str = "id, title, description, status, priority, assigned_to, created_by, due_date, created_at, updated_at";
const ANNOUNCEMENT_COLUMNS: &str = "id, title, content, priority, created_by, created_at";
const PROFILE_COLUMNS: &str = "id, full_name, email, role, department";

/// Capacity of the change-feed channel.
const EVENT_CAPACITY: usize = 256;

// ============================================================================
// Row Parsing Helpers
// ============================================================================

fn conversion_error(idx: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

/// Parses an enum column through its `FromStr` implementation.
fn parse_enum<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = DomainError>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

/// Parses an RFC3339 timestamp column into a `DateTime<Utc>`.
fn parse_timestamp(row: &Row, idx: usize, column_name: &str) -> rusqlite::Result<DateTime<Utc>> {
    let timestamp_str: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&timestamp_str).map(|dt| dt.with_timezone(&Utc)).map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, column_name.to_string(), rusqlite::types::Type::Text)
    })
}

fn parse_optional_timestamp(
    row: &Row,
    idx: usize,
    column_name: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let value: Option<String> = row.get(idx)?;
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    idx,
                    column_name.to_string(),
                    rusqlite::types::Type::Text,
                )
            })
        })
        .transpose()
}

fn parse_date(value: &str, idx: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

fn profile_from_row(row: &Row) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        role: parse_enum(row, 3)?,
        department: row.get(4)?,
    })
}

fn leave_from_row(row: &Row) -> rusqlite::Result<LeaveRequest> {
    let start: String = row.get(3)?;
    let end: String = row.get(4)?;
    Ok(LeaveRequest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        leave_type: row.get(2)?,
        start_date: parse_date(&start, 3)?,
        end_date: parse_date(&end, 4)?,
        reason: row.get(5)?,
        status: parse_enum(row, 6)?,
        reviewed_by: row.get(7)?,
        reviewed_at: parse_optional_timestamp(row, 8, "reviewed_at")?,
        created_at: parse_timestamp(row, 9, "created_at")?,
    })
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let due: Option<String> = row.get(7)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_enum(row, 3)?,
        priority: parse_enum(row, 4)?,
        assigned_to: row.get(5)?,
        created_by: row.get(6)?,
        due_date: due.as_deref().map(|d| parse_date(d, 7)).transpose()?,
        created_at: parse_timestamp(row, 8, "created_at")?,
        updated_at: parse_timestamp(row, 9, "updated_at")?,
    })
}

fn announcement_from_row(row: &Row) -> rusqlite::Result<Announcement> {
    Ok(Announcement {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        priority: parse_enum(row, 3)?,
        created_by: row.get(4)?,
        created_at: parse_timestamp(row, 5, "created_at")?,
    })
}

fn fetch_leave(conn: &Connection, id: &str) -> StorageResult<LeaveRequest> {
    conn.query_row(
        &format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?1"),
        params![id],
        leave_from_row,
    )
    .optional()?
    .ok_or_else(|| StorageError::NotFound(format!("leave_requests with id {} not found", id)))
}

fn fetch_task(conn: &Connection, id: &str) -> StorageResult<Task> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        task_from_row,
    )
    .optional()?
    .ok_or_else(|| StorageError::NotFound(format!("tasks with id {} not found", id)))
}

fn limit_clause(limit: Option<usize>) -> String {
    limit.map(|l| format!(" LIMIT {}", l)).unwrap_or_default()
}

// ============================================================================
// SQLite Store
// ============================================================================

/// SQLite-backed data store.
///
/// The connection sits behind an async mutex, so each call is one
/// serialized round trip. Every successful write is published on the change
/// feed returned by [`SqliteStore::subscribe`].
pub struct SqliteStore {
    db: Mutex<Database>,
    events: broadcast::Sender<StoreEvent>,
}

impl SqliteStore {
    /// Wraps an open database.
    pub fn new(db: Database) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { db: Mutex::new(db), events }
    }

    /// Opens (and initializes) a database file.
    pub fn open(path: &str) -> StorageResult<Self> {
        info!(path = %path, "Opening SQLite store");
        Ok(Self::new(Database::open(path)?))
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Subscribes to the change feed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Inserts a pending leave request under a caller-chosen ID.
    ///
    /// Used when importing requests that already carry an identifier.
    pub async fn insert_leave_request_with_id(
        &self,
        id: &str,
        input: &NewLeaveRequest,
    ) -> StorageResult<LeaveRequest> {
        input.validate()?;
        let request = LeaveRequest {
            id: id.to_string(),
            user_id: input.user_id.clone(),
            leave_type: input.leave_type.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason.clone(),
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };

        let db = self.db.lock().await;
        db.conn().execute(
            "INSERT INTO leave_requests (id, user_id, leave_type, start_date, end_date, reason, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                request.id,
                request.user_id,
                request.leave_type,
                request.start_date.to_string(),
                request.end_date.to_string(),
                request.reason,
                request.status.as_str(),
                request.created_at.to_rfc3339()
            ],
        )?;
        drop(db);

        debug!(leave_id = %request.id, user_id = %request.user_id, "Inserted leave request");
        self.publish("leave_requests", ChangeType::Insert, &request);
        Ok(request)
    }

    fn publish<T: Serialize>(&self, table: &str, event_type: ChangeType, row: &T) {
        // Nobody listening is fine
        if let Ok(row) = serde_json::to_value(row) {
            let _ = self.events.send(StoreEvent { table: table.to_string(), event_type, row });
        }
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn insert_profile(&self, profile: &Profile) -> StorageResult<()> {
        let db = self.db.lock().await;
        db.conn().execute(
            "INSERT INTO profiles (id, full_name, email, role, department) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                profile.id,
                profile.full_name,
                profile.email,
                profile.role.as_str(),
                profile.department
            ],
        )?;
        debug!(profile_id = %profile.id, role = %profile.role, "Inserted profile");
        Ok(())
    }

    async fn get_profile(&self, id: &str) -> StorageResult<Profile> {
        let db = self.db.lock().await;
        db.conn()
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                params![id],
                profile_from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("profiles with id {} not found", id)))
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        let db = self.db.lock().await;
        let mut stmt = db
            .conn()
            .prepare(&format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY full_name"))?;
        let profiles = stmt.query_map([], profile_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    async fn insert_leave_request(&self, input: &NewLeaveRequest) -> StorageResult<LeaveRequest> {
        self.insert_leave_request_with_id(&Uuid::new_v4().to_string(), input).await
    }

    async fn get_leave_request(&self, id: &str) -> StorageResult<LeaveRequest> {
        let db = self.db.lock().await;
        fetch_leave(db.conn(), id)
    }

    async fn resolve_leave_request(
        &self,
        id: &str,
        decision: LeaveDecision,
        reviewer_id: &str,
        reviewed_at: DateTime<Utc>,
    ) -> StorageResult<usize> {
        let status = decision.target_status();
        let db = self.db.lock().await;
        let changed = db.conn().execute(
            "UPDATE leave_requests SET status = ?1, reviewed_by = ?2, reviewed_at = ?3
             WHERE id = ?4 AND status = 'pending'",
            params![status.as_str(), reviewer_id, reviewed_at.to_rfc3339(), id],
        )?;
        let updated = if changed > 0 { Some(fetch_leave(db.conn(), id)?) } else { None };
        drop(db);

        debug!(leave_id = %id, status = %status, rows = changed, "Resolved leave request");
        if let Some(row) = updated {
            self.publish("leave_requests", ChangeType::Update, &row);
        }
        Ok(changed)
    }

    async fn list_leave_requests(&self, filter: &LeaveFilter) -> StorageResult<Vec<LeaveRequest>> {
        let mut clauses = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(ref user_id) = filter.user_id {
            values.push(SqlValue::Text(user_id.clone()));
            clauses.push(format!("user_id = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(SqlValue::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        let where_clause =
            if clauses.is_empty() { String::new() } else { format!(" WHERE {}", clauses.join(" AND ")) };
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests{where_clause} ORDER BY created_at DESC{}",
            limit_clause(filter.limit)
        );

        let db = self.db.lock().await;
        let mut stmt = db.conn().prepare(&sql)?;
        let rows =
            stmt.query_map(params_from_iter(values.iter()), leave_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn insert_task(&self, input: &NewTask) -> StorageResult<Task> {
        input.validate()?;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            description: input.description.clone(),
            status: TaskStatus::Pending,
            priority: input.priority,
            assigned_to: input.assigned_to.clone(),
            created_by: input.created_by.clone(),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };

        let db = self.db.lock().await;
        db.conn().execute(
            "INSERT INTO tasks (id, title, description, status, priority, assigned_to, created_by, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.assigned_to,
                task.created_by,
                task.due_date.map(|d| d.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339()
            ],
        )?;
        drop(db);

        debug!(task_id = %task.id, assigned_to = %task.assigned_to, "Inserted task");
        self.publish("tasks", ChangeType::Insert, &task);
        Ok(task)
    }

    async fn get_task(&self, id: &str) -> StorageResult<Task> {
        let db = self.db.lock().await;
        fetch_task(db.conn(), id)
    }

    async fn update_task_status(
        &self,
        id: &str,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
        owner_scope: Option<&str>,
    ) -> StorageResult<Task> {
        let db = self.db.lock().await;
        let changed = match owner_scope {
            Some(owner) => db.conn().execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND (assigned_to = ?4 OR created_by = ?4)",
                params![status.as_str(), updated_at.to_rfc3339(), id, owner],
            )?,
            None => db.conn().execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), updated_at.to_rfc3339(), id],
            )?,
        };

        // Distinguish a missing row from one the scope refused
        let task = fetch_task(db.conn(), id)?;
        drop(db);
        if changed == 0 {
            return Err(StorageError::Forbidden(format!(
                "task {} is not assigned to or created by {}",
                id,
                owner_scope.unwrap_or("caller")
            )));
        }

        debug!(task_id = %id, status = %status, "Updated task status");
        self.publish("tasks", ChangeType::Update, &task);
        Ok(task)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let mut clauses = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(ref assignee) = filter.assigned_to {
            values.push(SqlValue::Text(assignee.clone()));
            clauses.push(format!("assigned_to = ?{}", values.len()));
        }
        if let Some(status) = filter.status {
            values.push(SqlValue::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if filter.open_only {
            clauses.push("status != 'completed'".to_string());
        }
        let where_clause =
            if clauses.is_empty() { String::new() } else { format!(" WHERE {}", clauses.join(" AND ")) };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks{where_clause} ORDER BY created_at DESC{}",
            limit_clause(filter.limit)
        );

        let db = self.db.lock().await;
        let mut stmt = db.conn().prepare(&sql)?;
        let rows =
            stmt.query_map(params_from_iter(values.iter()), task_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    async fn insert_announcement(&self, input: &NewAnnouncement) -> StorageResult<Announcement> {
        input.validate()?;
        let announcement = Announcement {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            content: input.content.trim().to_string(),
            priority: input.priority,
            created_by: input.created_by.clone(),
            created_at: Utc::now(),
        };

        let db = self.db.lock().await;
        db.conn().execute(
            "INSERT INTO announcements (id, title, content, priority, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                announcement.id,
                announcement.title,
                announcement.content,
                announcement.priority.as_str(),
                announcement.created_by,
                announcement.created_at.to_rfc3339()
            ],
        )?;
        drop(db);

        debug!(announcement_id = %announcement.id, "Inserted announcement");
        self.publish("announcements", ChangeType::Insert, &announcement);
        Ok(announcement)
    }

    async fn list_announcements(&self, limit: usize) -> StorageResult<Vec<Announcement>> {
        let db = self.db.lock().await;
        let mut stmt = db.conn().prepare(&format!(
            "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements ORDER BY created_at DESC LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(params![limit as i64], announcement_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnouncementPriority, Role, TaskPriority};
    use std::sync::Arc;

    fn profile(id: &str, role: Role) -> Profile {
        Profile {
            id: id.to_string(),
            full_name: format!("User {id}"),
            email: format!("{id}@example.com"),
            role,
            department: None,
        }
    }

    async fn store_with_people() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_profile(&profile("emp", Role::Employee)).await.unwrap();
        store.insert_profile(&profile("mgr", Role::Manager)).await.unwrap();
        store.insert_profile(&profile("mgr2", Role::Manager)).await.unwrap();
        store
    }

    fn leave_input(user: &str) -> NewLeaveRequest {
        NewLeaveRequest {
            user_id: user.to_string(),
            leave_type: "annual".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 8).unwrap(),
            reason: Some("Trip".to_string()),
        }
    }

    fn task_input(assignee: &str, creator: &str) -> NewTask {
        NewTask {
            title: "Prepare onboarding pack".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            assigned_to: assignee.to_string(),
            created_by: creator.to_string(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_actor_resolved_from_profile() {
        let store = store_with_people().await;
        let actor = store.get_actor("mgr").await.unwrap();
        assert_eq!(actor.role, Role::Manager);
        assert!(matches!(store.get_actor("nobody").await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leave_round_trip() {
        let store = store_with_people().await;
        let created = store.insert_leave_request(&leave_input("emp")).await.unwrap();
        let loaded = store.get_leave_request(&created.id).await.unwrap();

        assert_eq!(loaded, created);
        assert_eq!(loaded.status, LeaveStatus::Pending);
        assert_eq!(loaded.days(), 5);
    }

    #[tokio::test]
    async fn test_resolve_only_from_pending() {
        let store = store_with_people().await;
        let created = store.insert_leave_request(&leave_input("emp")).await.unwrap();
        let first_at = Utc::now();

        let changed = store
            .resolve_leave_request(&created.id, LeaveDecision::Approve, "mgr", first_at)
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let changed = store
            .resolve_leave_request(&created.id, LeaveDecision::Reject, "mgr2", Utc::now())
            .await
            .unwrap();
        assert_eq!(changed, 0);

        let loaded = store.get_leave_request(&created.id).await.unwrap();
        assert_eq!(loaded.status, LeaveStatus::Approved);
        assert_eq!(loaded.reviewed_by.as_deref(), Some("mgr"));
        assert_eq!(loaded.reviewed_at.unwrap().timestamp(), first_at.timestamp());
    }

    #[tokio::test]
    async fn test_concurrent_resolution_changes_one_row() {
        let store = Arc::new(store_with_people().await);
        let created = store.insert_leave_request(&leave_input("emp")).await.unwrap();

        let a = {
            let store = Arc::clone(&store);
            let id = created.id.clone();
            tokio::spawn(async move {
                store.resolve_leave_request(&id, LeaveDecision::Approve, "mgr", Utc::now()).await
            })
        };
        let b = {
            let store = Arc::clone(&store);
            let id = created.id.clone();
            tokio::spawn(async move {
                store.resolve_leave_request(&id, LeaveDecision::Approve, "mgr2", Utc::now()).await
            })
        };

        let total = a.await.unwrap().unwrap() + b.await.unwrap().unwrap();
        assert_eq!(total, 1);

        let reviewer = store.get_leave_request(&created.id).await.unwrap().reviewed_by.unwrap();
        assert!(reviewer == "mgr" || reviewer == "mgr2");
    }

    #[tokio::test]
    async fn test_list_leave_filters() {
        let store = store_with_people().await;
        let mine = store.insert_leave_request(&leave_input("emp")).await.unwrap();
        let other = store.insert_leave_request(&leave_input("mgr2")).await.unwrap();
        store
            .resolve_leave_request(&other.id, LeaveDecision::Reject, "mgr", Utc::now())
            .await
            .unwrap();

        let own = store.list_leave_requests(&LeaveFilter::for_user("emp")).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, mine.id);

        let pending = store.list_leave_requests(&LeaveFilter::pending()).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, mine.id);

        let all = store.list_leave_requests(&LeaveFilter::default().with_limit(1)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_task_status_update_and_scope() {
        let store = store_with_people().await;
        let task = store.insert_task(&task_input("emp", "mgr")).await.unwrap();

        let updated = store
            .update_task_status(&task.id, TaskStatus::InProgress, Utc::now(), Some("emp"))
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        let refused = store
            .update_task_status(&task.id, TaskStatus::Completed, Utc::now(), Some("mgr2"))
            .await;
        assert!(matches!(refused, Err(StorageError::Forbidden(_))));

        let unscoped = store
            .update_task_status(&task.id, TaskStatus::Completed, Utc::now(), None)
            .await
            .unwrap();
        assert_eq!(unscoped.status, TaskStatus::Completed);

        let missing = store
            .update_task_status("0000000000", TaskStatus::Completed, Utc::now(), None)
            .await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_tasks_open_only() {
        let store = store_with_people().await;
        let done = store.insert_task(&task_input("emp", "mgr")).await.unwrap();
        store.insert_task(&task_input("emp", "mgr")).await.unwrap();
        store.insert_task(&task_input("mgr", "mgr")).await.unwrap();
        store.update_task_status(&done.id, TaskStatus::Completed, Utc::now(), None).await.unwrap();

        let open = store.list_tasks(&TaskFilter::assigned_to("emp").open()).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_ne!(open[0].id, done.id);
    }

    #[tokio::test]
    async fn test_unknown_assignee_is_store_error() {
        let store = store_with_people().await;
        let result = store.insert_task(&task_input("ghost", "mgr")).await;
        assert!(matches!(result, Err(StorageError::Connection(_))));
    }

    #[tokio::test]
    async fn test_change_feed_publishes_writes() {
        let store = store_with_people().await;
        let mut feed = store.subscribe();

        let announcement = store
            .insert_announcement(&NewAnnouncement {
                title: "Holiday".to_string(),
                content: "Office closed Friday".to_string(),
                priority: AnnouncementPriority::High,
                created_by: "mgr".to_string(),
            })
            .await
            .unwrap();

        let event = feed.recv().await.unwrap();
        assert_eq!(event.table, "announcements");
        assert_eq!(event.event_type, ChangeType::Insert);
        assert_eq!(event.row["id"], announcement.id);

        let listed = store.list_announcements(5).await.unwrap();
        assert_eq!(listed, vec![announcement]);
    }
}
