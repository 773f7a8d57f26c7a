use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    auth::{
        AuthProvider, guard,
        session::{self, CookieSettings},
    },
    handlers::{
        auth, pages,
        rpc::{self, note, profile},
    },
    repository::Database,
};

/// Dependencies shared by every request.
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub auth: Arc<dyn AuthProvider>,
    pub cookies: CookieSettings,
}

pub fn router(state: Arc<AppState>) -> Router {
    // RPC router config
    let rpc_router = Router::new()
        .route("/api/rpc/profile.get", get(profile::get))
        .route("/api/rpc/profile.update", post(profile::update))
        .route("/api/rpc/note.list", get(note::list))
        .route("/api/rpc/note.get", get(note::get))
        .route("/api/rpc/note.create", post(note::create))
        .route("/api/rpc/note.update", post(note::update))
        .route("/api/rpc/note.delete", post(note::delete))
        .route("/api/auth/signin", post(auth::sign_in))
        .route("/api/auth/signout", post(auth::sign_out));

    // Page router config, behind the route guard
    let page_router = Router::new()
        .route("/", get(pages::home))
        .route("/signin", get(pages::sign_in))
        .route("/signup", get(pages::sign_up))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/reset-password", get(pages::reset_password))
        .route("/dashboard", get(pages::dashboard))
        .route("/notes", get(pages::notes))
        .route("/profile", get(pages::profile))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(guard::route_guard));

    Router::new()
        .merge(rpc_router)
        .merge(page_router)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rpc::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    Arc::clone(&state),
                    session::session_layer,
                )),
        )
        .with_state(state)
}
