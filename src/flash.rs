//! One-shot notices carried across a POST -> redirect -> GET hop in a cookie.

use axum_extra::extract::{CookieJar, cookie::Cookie};

pub const FLASH_COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Error => "error",
        }
    }

    fn parse(s: &str) -> Level {
        match s {
            "success" => Level::Success,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

/// Queue a notice for the next rendered page
pub fn set_flash(jar: CookieJar, level: Level, message: impl Into<String>) -> CookieJar {
    let value = format!("{}:{}", level.as_str(), message.into());
    jar.add(
        Cookie::build((FLASH_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .build(),
    )
}

/// Consume the queued notice, if any
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE_NAME).map(|cookie| {
        let (level, message) = cookie
            .value()
            .split_once(':')
            .unwrap_or(("info", cookie.value()));
        Flash {
            level: Level::parse(level),
            message: message.to_string(),
        }
    });

    match flash {
        Some(flash) => {
            let jar = jar.remove(Cookie::build((FLASH_COOKIE_NAME, "")).path("/").build());
            (jar, Some(flash))
        }
        None => (jar, None),
    }
}
