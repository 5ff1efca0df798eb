#![allow(dead_code)]

use axum::Router;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

/// Must match the secret baked into `dayboard::create_app`
pub const TEST_JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub async fn create_test_app(pool: SqlitePool) -> TestApp {
    TestApp {
        router: dayboard::create_app(pool.clone()),
        pool,
    }
}

/// Insert a user directly and return its id
pub async fn create_user(pool: &SqlitePool, username: &str, email: &str, password: &str) -> String {
    let hashed = dayboard::password::hash_password(password).unwrap();
    dayboard::queries::users::insert_user(pool, username, email, "Test", "User", &hashed)
        .await
        .unwrap()
}

/// Session cookie header value for the given user id
pub fn auth_cookie_for(user_id: &str) -> String {
    let config = dayboard::config::JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        expiration_days: 7,
    };
    let token = dayboard::auth::generate_token(&config, user_id.to_string()).unwrap();
    format!("auth_token={token}")
}
