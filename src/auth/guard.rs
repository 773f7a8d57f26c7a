//! Page-level route guard.
//!
//! | authenticated | path class | action               |
//! |---------------|------------|----------------------|
//! | no            | protected  | redirect to sign-in  |
//! | yes           | auth-only  | redirect to dashboard|
//! | otherwise     |            | pass through         |

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session::Session;

pub const SIGN_IN_PATH: &str = "/signin";
pub const DASHBOARD_PATH: &str = "/dashboard";

const AUTH_ONLY_PREFIXES: [&str; 5] = [
    "/signin",
    "/signup",
    "/auth",
    "/forgot-password",
    "/reset-password",
];

const ASSET_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Not subject to the guard at all (API calls, static assets)
    Exempt,
    Home,
    AuthOnly,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    PassThrough,
    Redirect(&'static str),
}

pub fn classify(path: &str) -> PathClass {
    let exempt = path.starts_with("/api")
        || path.starts_with("/static/")
        || path == "/favicon.ico"
        || ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext));

    if exempt {
        PathClass::Exempt
    } else if path == "/" {
        PathClass::Home
    } else if AUTH_ONLY_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        PathClass::AuthOnly
    } else {
        PathClass::Protected
    }
}

pub const fn decide(authenticated: bool, class: PathClass) -> GuardAction {
    match (authenticated, class) {
        (false, PathClass::Protected) => GuardAction::Redirect(SIGN_IN_PATH),
        (true, PathClass::AuthOnly) => GuardAction::Redirect(DASHBOARD_PATH),
        _ => GuardAction::PassThrough,
    }
}

pub async fn route_guard(request: Request, next: Next) -> Response {
    let authenticated = request
        .extensions()
        .get::<Session>()
        .is_some_and(Session::is_authenticated);
    let class = classify(request.uri().path());

    match decide(authenticated, class) {
        GuardAction::PassThrough => next.run(request).await,
        GuardAction::Redirect(target) => {
            let location = match request.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target.to_string(),
            };
            tracing::debug!("redirecting {} to {location}", request.uri().path());

            Redirect::temporary(&location).into_response()
        }
    }
}
