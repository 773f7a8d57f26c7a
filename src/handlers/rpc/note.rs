use axum::Json;
use axum_macros::debug_handler;

use std::sync::Arc;

use super::{RpcContext, RpcInput};
use crate::{
    app::AppState,
    dto::{DeleteNoteResponse, NoteCreateInput, NoteIdInput, NoteUpdateInput},
    error::{ErrorBody, RpcError},
    models::Note,
};

#[utoipa::path(
    get,
    path = "/api/rpc/note.list",
    responses(
        (status = 200, description = "Caller's notes, newest first", body = Vec<Note>),
        (status = 401, description = "No session", body = ErrorBody)
    ),
    tag = "note"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn list(ctx: RpcContext) -> Result<Json<Vec<Note>>, RpcError> {
    Ok(Json(ctx.notes().list().await?))
}

#[utoipa::path(
    get,
    path = "/api/rpc/note.get",
    params(
        ("id" = String, Query, description = "Note ID (uuid)")
    ),
    responses(
        (status = 200, description = "Note found", body = Note),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 404, description = "Note not found", body = ErrorBody)
    ),
    tag = "note"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn get(
    ctx: RpcContext,
    RpcInput(id): RpcInput<NoteIdInput>,
) -> Result<Json<Note>, RpcError> {
    Ok(Json(ctx.notes().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/rpc/note.create",
    request_body = NoteCreateInput,
    responses(
        (status = 200, description = "Note created", body = Note),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody)
    ),
    tag = "note"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn create(
    ctx: RpcContext,
    RpcInput(draft): RpcInput<NoteCreateInput>,
) -> Result<Json<Note>, RpcError> {
    Ok(Json(ctx.notes().create(draft).await?))
}

#[utoipa::path(
    post,
    path = "/api/rpc/note.update",
    request_body = NoteUpdateInput,
    responses(
        (status = 200, description = "Note updated", body = Note),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody),
        (status = 404, description = "Note not found", body = ErrorBody)
    ),
    tag = "note"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn update(
    ctx: RpcContext,
    RpcInput((id, changes)): RpcInput<NoteUpdateInput>,
) -> Result<Json<Note>, RpcError> {
    Ok(Json(ctx.notes().update(id, changes).await?))
}

#[utoipa::path(
    post,
    path = "/api/rpc/note.delete",
    request_body = NoteIdInput,
    responses(
        (status = 200, description = "Note gone (also when it never existed)", body = DeleteNoteResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "No session", body = ErrorBody)
    ),
    tag = "note"
)]
#[debug_handler(state = Arc<AppState>)]
pub async fn delete(
    ctx: RpcContext,
    RpcInput(id): RpcInput<NoteIdInput>,
) -> Result<Json<DeleteNoteResponse>, RpcError> {
    let success = ctx.notes().delete(id).await?;
    Ok(Json(DeleteNoteResponse { success }))
}
