use askama::Template;
use axum::{extract::Query, response::Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::render_template;
use crate::auth::AuthUser;
use crate::calendar::{MonthView, month_view};
use crate::error::AppError;
use crate::flash::{Flash, take_flash};
use crate::queries::users::UserRow;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    user: Option<UserRow>,
    calendar: Option<MonthView>,
    flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct HomeQuery {
    year: Option<i32>,
    month: Option<u8>,
}

/// GET / - Month calendar, empty context when unauthenticated
pub async fn page(
    user: Option<AuthUser>,
    Query(query): Query<HomeQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    let (jar, flash) = take_flash(jar);

    let Some(AuthUser(user)) = user else {
        return Ok((
            jar,
            render_template(HomeTemplate {
                user: None,
                calendar: None,
                flash,
            }),
        ));
    };

    let today = time::OffsetDateTime::now_utc().date();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or(today.month() as u8);

    let calendar = month_view(year, month)?;

    Ok((
        jar,
        render_template(HomeTemplate {
            user: Some(user),
            calendar: Some(calendar),
            flash,
        }),
    ))
}
