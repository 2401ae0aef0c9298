use crate::handlers::{health, importance, performance, predict};
use crate::state::SharedState;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use hyper::Server;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the HTTP router with all prediction routes
pub fn create_server(state: SharedState) -> Router {
    // The dashboard is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/performance", get(performance))
        .route("/importance", get(importance))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Serve the prediction API on `addr` until the process receives Ctrl-C
pub async fn start_server(state: SharedState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_server(state);

    info!("HTTP server running on http://{}", addr);
    info!("Predict:     POST http://{}/predict", addr);
    info!("Performance: GET  http://{}/performance", addr);
    info!("Importance:  GET  http://{}/importance", addr);

    Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
