//! Daily task editor handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde::Deserialize;
use time::macros::format_description;

use super::{AppState, render_template};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::flash::{Flash, Level, set_flash, take_flash};
use crate::queries::tasks::{Priority, TaskFields, delete_task, tasks_for_day, upsert_task};
use crate::queries::users::UserRow;
use crate::schedule::{HourSlot, build_schedule};

#[derive(Template)]
#[template(path = "daily.html")]
struct DailyTemplate {
    user: UserRow,
    year: i32,
    month: u8,
    day: u8,
    formatted_date: String,
    schedule: Vec<HourSlot>,
    flash: Option<Flash>,
}

/// Resolve path components to a calendar date; out-of-range components
/// surface the calendar library's own rejection.
fn resolve_date(year: i32, month: u8, day: u8) -> Result<time::Date, time::error::ComponentRange> {
    let month_of_year = time::Month::try_from(month)?;
    time::Date::from_calendar_date(year, month_of_year, day)
}

fn date_key(year: i32, month: u8, day: u8) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

/// GET /tasks/{year}/{month}/{day} - Hourly schedule for one date
#[tracing::instrument(skip_all, fields(user = %user.id, year, month, day))]
pub async fn page(
    AuthUser(user): AuthUser,
    Path((year, month, day)): Path<(i32, u8, u8)>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    let date = resolve_date(year, month, day)?;
    let formatted_date = date.format(format_description!(
        "[weekday repr:long], [month repr:long] [day], [year]"
    ))?;

    let tasks = tasks_for_day(&state.pool, &user.id, &date_key(year, month, day)).await?;
    let schedule = build_schedule(tasks);

    let (jar, flash) = take_flash(jar);

    Ok((
        jar,
        render_template(DailyTemplate {
            user,
            year,
            month,
            day,
            formatted_date,
            schedule,
            flash,
        }),
    ))
}

#[derive(Deserialize)]
pub struct TaskForm {
    hour: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    completed: Option<String>,
}

/// POST /tasks/{year}/{month}/{day} - Save or remove the slot's task
///
/// A non-empty trimmed title upserts the slot; an empty title removes it.
/// Either way the browser is redirected back to the daily view so a refresh
/// cannot resubmit the form.
#[tracing::instrument(skip_all, fields(user = %user.id, year, month, day))]
pub async fn action(
    AuthUser(user): AuthUser,
    Path((year, month, day)): Path<(i32, u8, u8)>,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TaskForm>,
) -> Result<Response, AppError> {
    resolve_date(year, month, day)?;
    let date = date_key(year, month, day);

    let title = form.title.trim();
    let jar = if !title.is_empty() {
        let fields = TaskFields {
            title: title.to_string(),
            description: form.description.trim().to_string(),
            priority: form.priority,
            completed: form.completed.as_deref() == Some("on"),
        };
        upsert_task(&state.pool, &user.id, &date, form.hour, &fields).await?;

        set_flash(
            jar,
            Level::Success,
            format!("Task saved for {:02}:00!", form.hour),
        )
    } else {
        delete_task(&state.pool, &user.id, &date, form.hour).await?;

        set_flash(
            jar,
            Level::Info,
            format!("Task removed for {:02}:00!", form.hour),
        )
    };

    Ok((jar, Redirect::to(&format!("/tasks/{year}/{month}/{day}"))).into_response())
}
