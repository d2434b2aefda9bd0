use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::service::SentimentService;
use crate::web::handlers;

pub fn router(service: Arc<SentimentService>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/results", post(handlers::results))
        .route("/thanks", post(handlers::thanks))
        .route("/static/style.css", get(handlers::stylesheet))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// Serves until Ctrl-C.
pub async fn serve(config: ServerConfig, service: Arc<SentimentService>) -> Result<()> {
    let listener = TcpListener::bind(config.addr).await?;
    info!(
        "Listening on http://{} (persist feedback: {})",
        listener.local_addr()?,
        config.persist_feedback
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
