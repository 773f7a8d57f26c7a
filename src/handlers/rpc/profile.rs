use axum::Json;
use axum_macros::debug_handler;

use std::sync::Arc;

use super::{RpcContext, RpcInput};
use crate::{
    app::AppState,
    dto::ProfileUpdateInput,
    error::{ErrorBody, RpcError},
    models::Profile,
};

#[utoipa::path(
    get,
    path = "/api/rpc/profile.get",
    responses(
        (status = 200, description = "Caller's profile", body = Profile),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 404, description = "Profile not provisioned", body = ErrorBody)
    ),
    tag = "profile"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn get(ctx: RpcContext) -> Result<Json<Profile>, RpcError> {
    Ok(Json(ctx.profiles().get().await?))
}

#[utoipa::path(
    post,
    path = "/api/rpc/profile.update",
    request_body = ProfileUpdateInput,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 404, description = "Profile not provisioned", body = ErrorBody)
    ),
    tag = "profile"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn update(
    ctx: RpcContext,
    RpcInput(changes): RpcInput<ProfileUpdateInput>,
) -> Result<Json<Profile>, RpcError> {
    Ok(Json(ctx.profiles().update(changes).await?))
}
