//! HTTP service for a SQLite-backed todo list.
//!
//! # Overview
//! Routes live under `/api/v1/todos`, plus `/` and `/health`. Every handler
//! receives the shared [`TodoStore`] through router state, performs one store
//! call and answers with a `{code, message, data}` envelope.
//!
//! # Design
//! - The store handle is built once in [`serve`] and passed to [`app`]; there
//!   is no global connection state.
//! - Literal routes (`/todos/completed`, `/todos/all`) take precedence over
//!   `/todos/{id}` in axum's router, so they are never read as an id.
//! - Unknown paths and unsupported methods answer with the same JSON error
//!   body as every other failure.
//! - CORS is applied separately by [`cors_layer`] so tests can exercise the
//!   bare router.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod schemas;
pub mod store;
pub mod trace;

use axum::{
    http::{HeaderValue, header::InvalidHeaderValue},
    routing::{delete, get},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

pub use config::Config;
pub use error::ApiError;
pub use model::Todo;
pub use store::{StoreError, TodoStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("invalid CORS origin {origin:?}: {source}")]
    CorsOrigin {
        origin: String,
        #[source]
        source: InvalidHeaderValue,
    },

    #[error("server I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub fn app(store: TodoStore) -> Router {
    use handlers::*;

    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/completed", delete(delete_completed_todos))
        .route("/todos/all", delete(delete_all_todos))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        );

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", todos)
        .fallback(no_route)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(store);
    trace::with_request_tracing(router)
}

/// Allow credentialed requests from `origins` with any method or header.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|source| StartupError::CorsOrigin {
                origin: origin.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Serve `app` on `listener` until Ctrl-C or SIGTERM, then drain in-flight
/// requests.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Open the store, build the router and serve it per `config`.
pub async fn serve(config: Config) -> Result<(), StartupError> {
    let cors = cors_layer(&config.cors_origins)?;
    let store = TodoStore::connect(&config.database_url, config.max_connections).await?;
    if config.seed {
        let inserted = store.seed().await?;
        tracing::info!(inserted, "sample todos seeded");
    }

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, database = %config.database_url, "listening");
    let result = run(listener, app(store.clone()).layer(cors)).await;
    store.close().await;
    tracing::info!("server stopped");
    Ok(result?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
