// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookies holding the backend tokens.
//!
//! Five httpOnly cookies are the only state the gateway keeps:
//! - `access_token`, `token_type`, `token_exp` expire with the access token
//! - `refresh_token`, `refresh_exp` expire with the refresh token

use crate::models::TokenPayload;
use crate::time_utils::cookie_expiry;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const TOKEN_TYPE_COOKIE: &str = "token_type";
pub const TOKEN_EXP_COOKIE: &str = "token_exp";
pub const REFRESH_EXP_COOKIE: &str = "refresh_exp";

/// Every cookie the gateway owns.
pub const SESSION_COOKIES: [&str; 5] = [
    ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE,
    TOKEN_TYPE_COOKIE,
    TOKEN_EXP_COOKIE,
    REFRESH_EXP_COOKIE,
];

/// Token state read from the inbound cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub token_exp: Option<i64>,
    pub refresh_exp: Option<i64>,
}

impl SessionTokens {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let text = |name: &str| {
            jar.get(name)
                .map(|c| c.value().trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |name: &str| text(name).and_then(|v| v.parse::<i64>().ok());

        Self {
            access_token: text(ACCESS_TOKEN_COOKIE),
            refresh_token: text(REFRESH_TOKEN_COOKIE),
            token_type: text(TOKEN_TYPE_COOKIE),
            token_exp: number(TOKEN_EXP_COOKIE),
            refresh_exp: number(REFRESH_EXP_COOKIE),
        }
    }

    /// `Authorization` header value, if an access token is present.
    pub fn authorization(&self) -> Option<String> {
        let access_token = self.access_token.as_deref()?;
        let token_type = self.token_type.as_deref().unwrap_or("Bearer");
        Some(format!("{token_type} {access_token}"))
    }
}

fn session_cookie(
    name: &'static str,
    value: String,
    expires: Option<OffsetDateTime>,
    secure: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    if let Some(expires) = expires {
        cookie.set_expires(expires);
    }
    cookie
}

/// Overwrite all five session cookies with fresh backend tokens.
pub fn store_tokens(jar: CookieJar, tokens: &TokenPayload, secure: bool) -> CookieJar {
    let access_expiry = cookie_expiry(tokens.exp);
    let refresh_expiry = cookie_expiry(tokens.refresh_exp);

    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        access_expiry,
        secure,
    ))
    .add(session_cookie(
        TOKEN_TYPE_COOKIE,
        tokens.token_type.clone(),
        access_expiry,
        secure,
    ))
    .add(session_cookie(
        TOKEN_EXP_COOKIE,
        tokens.exp.to_string(),
        access_expiry,
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        refresh_expiry,
        secure,
    ))
    .add(session_cookie(
        REFRESH_EXP_COOKIE,
        tokens.refresh_exp.to_string(),
        refresh_expiry,
        secure,
    ))
}

/// Expire all five session cookies, whether or not the browser sent them.
pub fn clear_tokens(jar: CookieJar, secure: bool) -> CookieJar {
    SESSION_COOKIES.into_iter().fold(jar, |jar, name| {
        let mut cookie = session_cookie(name, String::new(), None, secure);
        cookie.set_max_age(Duration::ZERO);
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        jar.add(cookie)
    })
}
