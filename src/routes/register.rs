//! Registration handlers

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{AppState, FieldErrors, collect_field_errors, render_template};
use crate::auth::build_auth_cookie;
use crate::error::AppError;
use crate::flash::{Level, set_flash};
use crate::password::hash_password;
use crate::queries::users::{email_taken, insert_user, username_taken};

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    errors: FieldErrors,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Username is required"))]
    username: String,
    #[validate(email(message = "Enter a valid email address"))]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[validate(length(min = 8, max = 72, message = "Password must be at least 8 characters"))]
    password: String,
    #[validate(must_match(other = "password", message = "The two password fields didn't match"))]
    password_confirm: String,
}

/// GET /register - Show registration form
pub async fn page() -> Response {
    render_template(RegisterTemplate {
        errors: FieldErrors::new(),
        username: String::new(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    })
}

/// POST /register - Handle registration submission
pub async fn action(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let mut errors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => collect_field_errors(&e),
    };

    if !errors.contains_key("username") && username_taken(&state.pool, &form.username, None).await?
    {
        errors.insert(
            "username".to_string(),
            "A user with that username already exists".to_string(),
        );
    }
    if !errors.contains_key("email") && email_taken(&state.pool, &form.email, None).await? {
        errors.insert(
            "email".to_string(),
            "A user with that email already exists".to_string(),
        );
    }

    if !errors.is_empty() {
        return Ok(render_template(RegisterTemplate {
            errors,
            username: form.username,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
        }));
    }

    let hashed_password = hash_password(&form.password)?;
    let user_id = insert_user(
        &state.pool,
        &form.username,
        &form.email,
        &form.first_name,
        &form.last_name,
        &hashed_password,
    )
    .await?;

    info!(user_id = %user_id, username = %form.username, "User registered");

    // New accounts are signed in immediately
    let cookie = build_auth_cookie(&state.config.jwt, user_id)?;
    let jar = set_flash(
        jar.add(cookie),
        Level::Success,
        format!("Account created for {}!", form.username),
    );

    Ok((jar, Redirect::to("/")).into_response())
}
