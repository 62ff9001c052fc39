//! HTTP route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use time::OffsetDateTime;

use commitment_core::{commitment_text, format_long_date, FormDraft, StoredEnvelope};
use commitment_signature::{render_strokes, PadLayout, StrokeSet, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use commitment_storage::RecordStore;
use commitment_submit::{DeleteOutcome, ResultsView, SubmitError};

use super::json_error;
use super::page;
use super::state::AppState;

/// Body of `POST /submissions`. The signature is either a ready encoded
/// image or the raw strokes drawn on the page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitRequest {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    strokes: Option<StrokeSet>,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /
///
/// Touch devices get the signature pad in a modal; everything else draws
/// inline.
pub(crate) async fn handle_index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Html<String> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let layout = PadLayout::for_user_agent(user_agent);
    Html(page::render(
        OffsetDateTime::now_utc().date(),
        layout,
        state.config.reset_delay_ms,
    ))
}

/// GET /commitment
pub(crate) async fn handle_commitment() -> impl IntoResponse {
    let today = OffsetDateTime::now_utc().date();
    let response = serde_json::json!({
        "date": format_long_date(today),
        "text": commitment_text(today),
    });
    (StatusCode::OK, Json(response))
}

/// GET /status
pub(crate) async fn handle_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.orchestrator.state()))
}

/// POST /submissions
pub(crate) async fn handle_submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return json_error(rejection.status(), &rejection.body_text()),
    };
    let SubmitRequest {
        full_name,
        position,
        signature,
        strokes,
    } = request;

    let signature = match resolve_signature(signature, strokes).await {
        Ok(s) => s,
        Err(msg) => return json_error(StatusCode::BAD_REQUEST, &msg),
    };
    let draft = FormDraft::new(&full_name, &position, &signature);

    // A started submission runs to an outcome even if the client goes away.
    let orchestrator = Arc::clone(&state.orchestrator);
    let result = tokio::spawn(async move { orchestrator.submit(&draft).await }).await;

    match result {
        Ok(Ok(report)) => {
            state
                .orchestrator
                .schedule_reset(report.id.clone(), state.reset_delay());
            (StatusCode::CREATED, Json(report)).into_response()
        }
        Ok(Err(e)) => json_error(status_for(&e), &e.to_string()),
        Err(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("failed to submit form: {}", e),
        ),
    }
}

/// GET /submissions
pub(crate) async fn handle_list_submissions(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store();
    match tokio::task::spawn_blocking(move || ResultsView::load(store).entries().to_vec()).await {
        Ok(entries) => {
            let response = serde_json::json!({ "submissions": entries });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// GET /submissions/{id}
pub(crate) async fn handle_get_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let store = state.store();
    let lookup = id.clone();
    let found: Result<Option<StoredEnvelope>, _> =
        tokio::task::spawn_blocking(move || store.get(&lookup)).await;
    match found {
        Ok(Some(entry)) => (StatusCode::OK, Json(entry)).into_response(),
        Ok(None) => not_found(&id),
        Err(e) => internal_error(e),
    }
}

/// DELETE /submissions/{id}
///
/// The request itself is the confirmation.
pub(crate) async fn handle_delete_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let store = state.store();
    let target = id.clone();
    let outcome =
        tokio::task::spawn_blocking(move || ResultsView::load(store).delete(&target, |_| true))
            .await;
    match outcome {
        Ok(DeleteOutcome::Deleted) => {
            (StatusCode::OK, Json(serde_json::json!({ "deleted": id }))).into_response()
        }
        Ok(DeleteOutcome::NotFound | DeleteOutcome::Cancelled) => not_found(&id),
        Err(e) => internal_error(e),
    }
}

async fn resolve_signature(
    signature: Option<String>,
    strokes: Option<StrokeSet>,
) -> Result<String, String> {
    if let Some(signature) = signature.filter(|s| !s.is_empty()) {
        return Ok(signature);
    }
    let Some(strokes) = strokes else {
        return Ok(String::new());
    };
    // The page only ever draws on the default surface.
    strokes
        .check_limits(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        .map_err(|e| format!("invalid signature strokes: {}", e))?;
    match tokio::task::spawn_blocking(move || render_strokes(&strokes)).await {
        Ok(Ok(encoded)) => Ok(encoded),
        Ok(Err(e)) => Err(format!("invalid signature strokes: {}", e)),
        Err(e) => Err(format!("failed to render signature: {}", e)),
    }
}

fn status_for(error: &SubmitError) -> StatusCode {
    match error {
        SubmitError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::InProgress => StatusCode::CONFLICT,
        SubmitError::Storage(_) | SubmitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn not_found(id: &str) -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        &format!("submission '{}' not found", id),
    )
}

fn internal_error(e: tokio::task::JoinError) -> Response {
    tracing::error!(error = %e, "request task failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}
