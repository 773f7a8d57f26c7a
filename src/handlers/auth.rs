use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{
    app::AppState,
    auth::session::{self, ACCESS_COOKIE},
    dto::SignInInput,
    error::{ErrorBody, RpcError},
    handlers::rpc::RpcInput,
    models::AuthUser,
};

fn with_cookies(cookies: Vec<axum::http::HeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(SET_COOKIE, cookie);
    }
    headers
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SignInInput,
    responses(
        (status = 200, description = "Signed in, session cookies set", body = AuthUser),
        (status = 400, description = "Malformed or incomplete credentials", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Auth provider unavailable", body = ErrorBody)
    ),
    tag = "auth"
)]
#[debug_handler]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    RpcInput(credentials): RpcInput<SignInInput>,
) -> Response {
    match state
        .auth
        .sign_in(&credentials.email, &credentials.password)
        .await
    {
        Ok(Some(tokens)) => {
            tracing::info!("user {} signed in", tokens.user.id);
            let headers = with_cookies(session::session_cookies(&tokens, state.cookies));
            (StatusCode::OK, headers, Json(tokens.user)).into_response()
        }
        Ok(None) => RpcError::Unauthorized.into_response(),
        Err(e) => RpcError::Unexpected(format!("sign in failed: {e}")).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses(
        (status = 204, description = "Session cookies cleared")
    ),
    tag = "auth"
)]
#[debug_handler]
pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session::parse_cookie(&headers, ACCESS_COOKIE) {
        if let Err(e) = state.auth.sign_out(&token).await {
            tracing::warn!("auth provider sign out failed: {e}");
        }
    }

    let headers = with_cookies(session::cleared_cookies(state.cookies));
    (StatusCode::NO_CONTENT, headers).into_response()
}
