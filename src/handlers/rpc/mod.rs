pub mod note;
pub mod profile;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{Method, request::Parts},
};
use serde::de::DeserializeOwned;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    app::AppState,
    auth::session::Session,
    dto::{
        DeleteNoteResponse, NoteCreateInput, NoteIdInput, NoteUpdateInput, ProfileUpdateInput,
        SignInInput, Validate,
    },
    error::{ErrorBody, ErrorDetail, RpcError},
    models::{AuthUser, Note, Profile},
    repository::{Database, NoteRepository, ProfileRepository},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        profile::get,
        profile::update,
        note::list,
        note::get,
        note::create,
        note::update,
        note::delete,
        crate::handlers::auth::sign_in,
        crate::handlers::auth::sign_out
    ),
    components(schemas(
        Profile,
        Note,
        AuthUser,
        ProfileUpdateInput,
        NoteIdInput,
        NoteCreateInput,
        NoteUpdateInput,
        DeleteNoteResponse,
        SignInInput,
        ErrorBody,
        ErrorDetail
    )),
    tags(
        (name = "profile", description = "Own profile procedures"),
        (name = "note", description = "Own notes procedures"),
        (name = "auth", description = "Session cookies")
    )
)]
pub struct ApiDoc;

/// Per-request context of an authenticated procedure call.
///
/// The owner identity comes only from the verified session, never from the
/// request payload.
pub struct RpcContext {
    pub db: Arc<dyn Database>,
    pub user: AuthUser,
}

impl RpcContext {
    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(Arc::clone(&self.db), self.user.id)
    }

    pub fn notes(&self) -> NoteRepository {
        NoteRepository::new(Arc::clone(&self.db), self.user.id)
    }
}

impl FromRequestParts<Arc<AppState>> for RpcContext {
    type Rejection = RpcError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<Session>()
            .and_then(|session| session.user.clone())
            .ok_or(RpcError::Unauthorized)?;

        Ok(Self {
            db: Arc::clone(&state.db),
            user,
        })
    }
}

/// Validated procedure input: read from the query string for queries (GET)
/// and from the JSON body for mutations.
pub struct RpcInput<T: Validate>(pub T::Valid);

impl<S, T> FromRequest<S> for RpcInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let input = if req.method() == Method::GET {
            let Query(input) = Query::<T>::try_from_uri(req.uri())
                .map_err(|e| RpcError::MalformedInput(e.body_text()))?;
            input
        } else {
            let Json(input) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| RpcError::MalformedInput(e.body_text()))?;
            input
        };

        Ok(Self(input.validate()?))
    }
}
