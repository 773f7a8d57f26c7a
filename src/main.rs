use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use notes_portal::{
    app::{self, AppState},
    auth::{GoTrueClient, session::CookieSettings},
    config::{self, DatabaseConfig},
    repository::{Database, MemoryDatabase, PgDatabase},
};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });
    tracing::info!("Successfully loaded config");

    // Storage creation and migration
    let db: Arc<dyn Database> = match &cfg.database {
        DatabaseConfig::Postgres { dsn } => {
            let mut pg = PgDatabase::connect(dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });

            pg.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });

            Arc::new(pg)
        }
        DatabaseConfig::Memory => {
            tracing::warn!("Using in-memory storage, data will not survive a restart");
            Arc::new(MemoryDatabase::new())
        }
    };

    // Auth provider client
    let auth = Arc::new(GoTrueClient::new(&cfg.auth.url, &cfg.auth.anon_key));

    let state = Arc::new(AppState {
        db,
        auth,
        cookies: CookieSettings {
            secure: cfg.secure_cookies,
        },
    });

    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Server starting, listening on {}", addr),
        Err(e) => tracing::warn!("Server starting, local address unknown: {e}"),
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
