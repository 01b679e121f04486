//! The HTTP control surface.
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/` | control page |
//! | GET | `/api/listByUsernamePattern` | JSON array of matching users |
//! | POST | `/api/deleteUser` | `{"email": ...}` in, `deleted` out |
//!
//! Everything else is answered with `404 Not Found`. The endpoints do not
//! authenticate their callers; put the server behind something that does.
mod error;
mod routes;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::{filter::UsernamePattern, Client};

pub use error::ServeError;

/// Shared, read-only state of every request.
#[derive(Debug, Clone)]
pub struct AppState {
    client: Client,
    pattern: Arc<UsernamePattern>,
}

impl AppState {
    pub fn new(client: Client, pattern: UsernamePattern) -> Self {
        Self {
            client,
            pattern: Arc::new(pattern),
        }
    }
}

pub struct ServeConfig {
    pub listen_address: SocketAddr,
    pub client: Client,
    pub pattern: UsernamePattern,
}

/// Build the router. Wrong methods on known paths are answered like
/// unknown paths. That includes HEAD, which axum would otherwise route to the
/// GET handlers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index).fallback(routes::not_found))
        .route(
            "/api/listByUsernamePattern",
            get(routes::list_by_username_pattern).fallback(routes::not_found),
        )
        .route(
            "/api/deleteUser",
            post(routes::delete_user).fallback(routes::not_found),
        )
        .fallback(routes::not_found)
        .layer(middleware::from_fn(routes::reject_head))
        .with_state(state)
}

/// Serve until ctrl-c is received.
pub async fn serve(
    ServeConfig {
        listen_address,
        client,
        pattern,
    }: ServeConfig,
) -> Result<(), ServeError> {
    let app = router(AppState::new(client, pattern));

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(ServeError::Bind)?;
    let local_address = listener.local_addr().map_err(ServeError::Bind)?;
    tracing::info!("control page available at: http://{local_address}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Server)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
