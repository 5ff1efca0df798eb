use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use sqlx::SqlitePool;

mod assets;
mod health;
mod home;
mod login;
mod profile;
mod register;
mod tasks;

pub use assets::AssetsService;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pool: SqlitePool,
}

/// Field name -> message mapping produced by form validators
pub(crate) type FieldErrors = std::collections::BTreeMap<String, String>;

/// Flatten derive-based validation errors to one message per field
pub(crate) fn collect_field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("Invalid value for {field}"));
            (field.to_string(), message)
        })
        .collect()
}

/// Helper to render templates
pub(crate) fn render_template<T: Template>(t: T) -> Response {
    match t.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate;

async fn fallback() -> Response {
    let mut response = render_template(NotFoundTemplate);
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(state.pool.clone())
        .merge(
            Router::new()
                .route("/", get(home::page))
                .route("/register", get(register::page).post(register::action))
                .route("/login", get(login::page).post(login::action))
                .route("/logout", post(login::logout))
                .route(
                    "/tasks/{year}/{month}/{day}",
                    get(tasks::page).post(tasks::action),
                )
                .route("/profile", get(profile::page).post(profile::action))
                .fallback(fallback)
                .nest_service("/static", AssetsService::new())
                .with_state(state),
        )
}
