//! Cookie-carried sessions.
//!
//! The provider's token pair travels in two cookies. Every request is resolved
//! once by [`session_layer`]; the outcome is stored in request extensions as a
//! [`Session`] and any refreshed or cleared cookies are written onto the
//! response on the way out.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};

use std::sync::Arc;

use super::{AuthProvider, SessionTokens};
use crate::{app::AppState, models::AuthUser};

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

// 400 days, the longest lifetime browsers honour
const REFRESH_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub secure: bool,
}

/// Resolved identity of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<AuthUser>,
}

impl Session {
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Outcome of resolving a request's cookies.
#[derive(Debug, Default)]
pub struct Resolution {
    pub user: Option<AuthUser>,
    /// `Set-Cookie` values to attach to the outgoing response
    pub set_cookies: Vec<HeaderValue>,
}

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn cookie_header(
    name: &str,
    value: &str,
    max_age: i64,
    settings: CookieSettings,
) -> Option<HeaderValue> {
    let secure = if settings.secure { "; Secure" } else { "" };
    let cookie = format!("{name}={value}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax{secure}");

    HeaderValue::from_str(&cookie)
        .map_err(|e| tracing::warn!("dropping unrepresentable {name} cookie: {e}"))
        .ok()
}

pub fn session_cookies(tokens: &SessionTokens, settings: CookieSettings) -> Vec<HeaderValue> {
    [
        cookie_header(ACCESS_COOKIE, &tokens.access_token, tokens.expires_in, settings),
        cookie_header(
            REFRESH_COOKIE,
            &tokens.refresh_token,
            REFRESH_MAX_AGE_SECS,
            settings,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn cleared_cookies(settings: CookieSettings) -> Vec<HeaderValue> {
    [
        cookie_header(ACCESS_COOKIE, "", 0, settings),
        cookie_header(REFRESH_COOKIE, "", 0, settings),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Validates the request's session against the provider, refreshing it when
/// the access token is no longer accepted. Never fails: anything short of a
/// verified user resolves to an anonymous request.
pub async fn resolve_session(
    provider: &dyn AuthProvider,
    headers: &HeaderMap,
    settings: CookieSettings,
) -> Resolution {
    let access = parse_cookie(headers, ACCESS_COOKIE);
    let refresh = parse_cookie(headers, REFRESH_COOKIE);

    if let Some(token) = access.as_deref() {
        match provider.get_user(token).await {
            Ok(Some(user)) => {
                return Resolution {
                    user: Some(user),
                    set_cookies: Vec::new(),
                };
            }
            Ok(None) => tracing::debug!("access token rejected by auth provider"),
            Err(e) => {
                tracing::warn!("failed to verify session: {e}");
                return Resolution::default();
            }
        }
    }

    let Some(refresh) = refresh else {
        return if access.is_some() {
            Resolution {
                user: None,
                set_cookies: cleared_cookies(settings),
            }
        } else {
            Resolution::default()
        };
    };

    match provider.refresh(&refresh).await {
        Ok(Some(tokens)) => {
            tracing::debug!("session refreshed for {}", tokens.user.id);
            Resolution {
                set_cookies: session_cookies(&tokens, settings),
                user: Some(tokens.user),
            }
        }
        Ok(None) => {
            tracing::debug!("refresh token rejected, clearing session cookies");
            Resolution {
                user: None,
                set_cookies: cleared_cookies(settings),
            }
        }
        Err(e) => {
            tracing::warn!("failed to refresh session: {e}");
            Resolution::default()
        }
    }
}

pub async fn session_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolution = resolve_session(state.auth.as_ref(), request.headers(), state.cookies).await;

    request.extensions_mut().insert(Session {
        user: resolution.user,
    });

    let mut response = next.run(request).await;

    // Handlers that issue their own session cookies (sign in/out) take precedence
    if !response.headers().contains_key(SET_COOKIE) {
        for cookie in resolution.set_cookies {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }

    response
}
