//! Task row accessors keyed by (user, date, hour)

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task row from the tasks table, unique on (user_id, date, hour)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub user_id: String,
    pub date: String,
    pub hour: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

/// Fields written on every save of a slot
#[derive(Debug, Clone)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

/// All of a user's tasks for one date
pub async fn tasks_for_day(
    pool: &SqlitePool,
    user_id: &str,
    date: &str,
) -> anyhow::Result<Vec<TaskRow>> {
    let tasks = sqlx::query_as::<_, TaskRow>(
        "SELECT id, user_id, date, hour, title, description, priority, completed
         FROM tasks WHERE user_id = ? AND date = ? ORDER BY hour",
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Create-if-absent-else-update keyed by (user_id, date, hour)
///
/// A single statement so concurrent submissions for one slot cannot create
/// duplicate rows; racing writers end up last-write-wins.
pub async fn upsert_task(
    pool: &SqlitePool,
    user_id: &str,
    date: &str,
    hour: i64,
    fields: &TaskFields,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO tasks (user_id, date, hour, title, description, priority, completed)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id, date, hour) DO UPDATE SET
             title = excluded.title,
             description = excluded.description,
             priority = excluded.priority,
             completed = excluded.completed",
    )
    .bind(user_id)
    .bind(date)
    .bind(hour)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.priority)
    .bind(fields.completed)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the task at (user_id, date, hour), if any
pub async fn delete_task(
    pool: &SqlitePool,
    user_id: &str,
    date: &str,
    hour: i64,
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM tasks WHERE user_id = ? AND date = ? AND hour = ?")
        .bind(user_id)
        .bind(date)
        .bind(hour)
        .execute(pool)
        .await?;

    Ok(())
}
