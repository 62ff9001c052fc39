//! `commitment serve` -- HTTP form service.
//!
//! Serves the commitment page and drives the same submit pipeline as the
//! CLI, with the results view exposed as JSON endpoints.
//!
//! Endpoints:
//! - GET    /                  - Commitment page (HTML)
//! - GET    /health            - Server status
//! - GET    /commitment        - Commitment text for today
//! - GET    /status            - Current submit state
//! - POST   /submissions       - Submit a signed form
//! - GET    /submissions       - List stored submissions
//! - GET    /submissions/{id}  - One stored submission
//! - DELETE /submissions/{id}  - Delete a stored submission
//!
//! Errors are JSON objects of the form `{"error": "..."}`.

mod handlers;
mod page;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use commitment_core::Config;

use self::handlers::{
    handle_commitment, handle_delete_submission, handle_get_submission, handle_health,
    handle_index, handle_list_submissions, handle_not_found, handle_status, handle_submit,
};
use self::state::AppState;
use crate::context::{build_orchestrator, open_store};

/// Maximum request body size: 10 MB.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}

/// Build the router over `state`.
fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/commitment", get(handle_commitment))
        .route("/status", get(handle_status))
        .route(
            "/submissions",
            get(handle_list_submissions).post(handle_submit),
        )
        .route(
            "/submissions/{id}",
            get(handle_get_submission).delete(handle_delete_submission),
        )
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the form service on `port` and run until Ctrl+C.
pub async fn start_server(config: Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config);
    let orchestrator = Arc::new(build_orchestrator(&config, store));

    tracing::info!(
        data_dir = %config.data_dir.display(),
        webhook = %config.webhook_url,
        demo_upload = config.uses_demo_upload_key(),
        "form service configured"
    );

    let state = Arc::new(AppState::new(config, orchestrator));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Commitment form listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
