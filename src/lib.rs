pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod flash;
pub mod observability;
pub mod password;
pub mod queries;
pub mod routes;
pub mod schedule;

pub use routes::AppState;

/// Create app router for testing
///
/// Builds the Axum router with all routes configured against the given pool,
/// useful for integration testing without starting the full server.
pub fn create_app(pool: sqlx::SqlitePool) -> axum::Router {
    let config = config::Config {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: config::DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: config::JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
        },
        observability: config::ObservabilityConfig::default(),
    };

    routes::router(AppState { config, pool })
}
