//! Profile page: identity form and password form, discriminated by form_type

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
use crate::auth::{AuthUser, build_auth_cookie};
use crate::error::AppError;
use crate::flash::{Flash, Level, set_flash, take_flash};
use crate::password::{hash_password, verify_password};
use crate::queries::users::{UserRow, email_taken, update_password, update_profile, username_taken};

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    user: UserRow,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    profile_errors: FieldErrors,
    password_errors: FieldErrors,
    flash: Option<Flash>,
}

impl ProfileTemplate {
    /// Both forms in their display-only state, initialized from the row
    fn initial(user: UserRow, flash: Option<Flash>) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            user,
            profile_errors: FieldErrors::new(),
            password_errors: FieldErrors::new(),
            flash,
        }
    }
}

/// GET /profile - Show both forms
pub async fn page(
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let (jar, flash) = take_flash(jar);
    (jar, render_template(ProfileTemplate::initial(user, flash)))
}

#[derive(Deserialize)]
pub struct ProfileActionForm {
    form_type: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
    #[serde(default)]
    new_password_confirm: String,
}

#[derive(Validate)]
struct ProfileInput<'a> {
    #[validate(length(min = 1, message = "Username is required"))]
    username: &'a str,
    #[validate(email(message = "Enter a valid email address"))]
    email: &'a str,
}

/// Identity-field validation: shape checks plus global uniqueness excluding
/// the user's own row
async fn validate_profile(
    state: &AppState,
    user: &UserRow,
    form: &ProfileActionForm,
) -> Result<FieldErrors, AppError> {
    let input = ProfileInput {
        username: &form.username,
        email: &form.email,
    };
    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => collect_field_errors(&e),
    };

    if !errors.contains_key("username")
        && username_taken(&state.pool, &form.username, Some(&user.id)).await?
    {
        errors.insert(
            "username".to_string(),
            "A user with that username already exists".to_string(),
        );
    }
    if !errors.contains_key("email")
        && email_taken(&state.pool, &form.email, Some(&user.id)).await?
    {
        errors.insert(
            "email".to_string(),
            "A user with that email already exists".to_string(),
        );
    }

    Ok(errors)
}

/// Password-change validation: current credential check, policy, confirmation
fn validate_password_change(user: &UserRow, form: &ProfileActionForm) -> Result<FieldErrors, AppError> {
    let mut errors = FieldErrors::new();

    if !verify_password(&form.current_password, &user.hashed_password)? {
        errors.insert(
            "current_password".to_string(),
            "Your current password was entered incorrectly".to_string(),
        );
    }
    if form.new_password.len() < 8 {
        errors.insert(
            "new_password".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
    }
    if form.new_password != form.new_password_confirm {
        errors.insert(
            "new_password_confirm".to_string(),
            "The two password fields didn't match".to_string(),
        );
    }

    Ok(errors)
}

/// POST /profile - Process exactly the submitted form; the other one is
/// rendered back in its display-only state
pub async fn action(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ProfileActionForm>,
) -> Result<Response, AppError> {
    match form.form_type.as_str() {
        "profile" => {
            let errors = validate_profile(&state, &user, &form).await?;
            if !errors.is_empty() {
                return Ok(render_template(ProfileTemplate {
                    username: form.username,
                    email: form.email,
                    first_name: form.first_name,
                    last_name: form.last_name,
                    user,
                    profile_errors: errors,
                    password_errors: FieldErrors::new(),
                    flash: None,
                }));
            }

            update_profile(
                &state.pool,
                &user.id,
                &form.username,
                &form.email,
                &form.first_name,
                &form.last_name,
            )
            .await?;

            info!(user_id = %user.id, "Profile updated");

            let jar = set_flash(jar, Level::Success, "Your profile was updated.");
            Ok((jar, Redirect::to("/profile")).into_response())
        }
        "password" => {
            let errors = validate_password_change(&user, &form)?;
            if !errors.is_empty() {
                let mut template = ProfileTemplate::initial(user, None);
                template.password_errors = errors;
                return Ok(render_template(template));
            }

            let hashed_password = hash_password(&form.new_password)?;
            update_password(&state.pool, &user.id, &hashed_password).await?;

            info!(user_id = %user.id, "Password changed");

            // Re-issue the session cookie so the credential change does not
            // log the user out
            let cookie = build_auth_cookie(&state.config.jwt, user.id.clone())?;
            let jar = set_flash(
                jar.add(cookie),
                Level::Success,
                "Your password was successfully updated.",
            );
            Ok((jar, Redirect::to("/profile")).into_response())
        }
        _ => Ok(render_template(ProfileTemplate::initial(user, None))),
    }
}
