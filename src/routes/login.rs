//! Login and logout handlers

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AppState, render_template};
use crate::auth::{build_auth_cookie, clear_auth_cookie};
use crate::error::AppError;
use crate::flash::{Level, set_flash};
use crate::password::verify_password;
use crate::queries::users::get_user_by_username;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// GET /login - Show login form
pub async fn page() -> Response {
    render_template(LoginTemplate { error: None })
}

/// POST /login - Handle login submission
pub async fn action(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let invalid = || {
        render_template(LoginTemplate {
            error: Some("Invalid username or password".to_string()),
        })
    };

    let Some(user) = get_user_by_username(&state.pool, &form.username).await? else {
        warn!(username = %form.username, "Login attempt for unknown user");
        return Ok(invalid());
    };

    if !verify_password(&form.password, &user.hashed_password)? {
        warn!(username = %form.username, "Login attempt with wrong password");
        return Ok(invalid());
    }

    let cookie = build_auth_cookie(&state.config.jwt, user.id.clone())?;
    let jar = set_flash(
        jar.add(cookie),
        Level::Info,
        format!("You are now logged in as {}.", user.username),
    );

    info!(user_id = %user.id, "User logged in successfully");

    Ok((jar, Redirect::to("/")).into_response())
}

/// POST /logout - Clear session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = set_flash(
        jar.remove(clear_auth_cookie()),
        Level::Info,
        "You have successfully logged out.",
    );
    (jar, Redirect::to("/"))
}
