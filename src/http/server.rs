use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::{AppState, handlers};

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/me", get(handlers::me))
        .route("/api/documents", get(handlers::list_documents))
        .route("/api/upload", post(handlers::upload))
        .route("/api/chat/ask", post(handlers::ask))
        .route("/api/progress", get(handlers::progress_stream))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(25 * 1024 * 1024)) // 25MB cap
        .layer(TraceLayer::new_for_http())
}

pub async fn run(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
