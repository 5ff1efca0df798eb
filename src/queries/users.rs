//! User row accessors

use sqlx::SqlitePool;

/// User row from the users table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: String,
    pub created_at: i64,
}

/// Get user by ID
pub async fn get_user(pool: &SqlitePool, user_id: &str) -> anyhow::Result<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, first_name, last_name, hashed_password, created_at
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> anyhow::Result<Option<UserRow>> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, first_name, last_name, hashed_password, created_at
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a new user and return its generated id
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    hashed_password: &str,
) -> anyhow::Result<String> {
    let id = ulid::Ulid::new().to_string();
    let created_at = time::OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO users (id, username, email, first_name, last_name, hashed_password, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(hashed_password)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Update identity fields
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE users SET username = ?, email = ?, first_name = ?, last_name = ? WHERE id = ?",
    )
    .bind(username)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace the stored password hash
pub async fn update_password(
    pool: &SqlitePool,
    user_id: &str,
    hashed_password: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
        .bind(hashed_password)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Is the username already used by a different user?
pub async fn username_taken(
    pool: &SqlitePool,
    username: &str,
    exclude_user_id: Option<&str>,
) -> anyhow::Result<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? AND id != COALESCE(?, ''))",
    )
    .bind(username)
    .bind(exclude_user_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Is the email already used by a different user?
pub async fn email_taken(
    pool: &SqlitePool,
    email: &str,
    exclude_user_id: Option<&str>,
) -> anyhow::Result<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != COALESCE(?, ''))",
    )
    .bind(email)
    .bind(exclude_user_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}
