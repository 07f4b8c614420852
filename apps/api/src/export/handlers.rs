//! Axum route handlers for the Export API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::clipboard::{CopyDelivery, TierKind};
use crate::export::html::to_html;
use crate::export::orchestrator::ExportSnapshot;
use crate::export::validation::{validate_for_export, ValidationReport};
use crate::export::{ExportArtifact, ExportFormat, ExportOutcome};
use crate::models::resume::ResumeRecord;
use crate::render::Theme;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub record: ResumeRecord,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub record: ResumeRecord,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub record: ResumeRecord,
    #[serde(default)]
    pub theme: Theme,
    pub format: ExportFormat,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub tier: TierKind,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/preview
///
/// Renders the HTML document without checking completeness.
pub async fn handle_preview(Json(request): Json<RenderRequest>) -> Html<String> {
    Html(to_html(&request.record, request.theme))
}

/// POST /api/v1/export/check
pub async fn handle_check(Json(request): Json<CheckRequest>) -> Json<ValidationReport> {
    Json(validate_for_export(&request.record))
}

/// POST /api/v1/sessions/:session_id/export
///
/// Streams the finished file back as an attachment. Returns 409 while another export for
/// the same session is running.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let orchestrator = state.sessions.open(session_id);
    let outcome = orchestrator
        .export(&request.record, request.theme, request.format)
        .await?;

    match outcome {
        ExportOutcome::Delivered(artifact) => Ok(attachment(artifact)),
        ExportOutcome::Ignored => Err(AppError::Conflict(
            "An export is already in progress for this session".to_string(),
        )),
    }
}

/// GET /api/v1/sessions/:session_id/export/progress
pub async fn handle_export_progress(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<ExportSnapshot> {
    Json(state.sessions.snapshot(session_id))
}

/// POST /api/v1/copy/html
///
/// Returns the tier that took the content, or the manual copy page as `text/html`.
pub async fn handle_copy_html(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let receipt = state
        .clipboard
        .copy_html(&request.record, request.theme)
        .await?;

    Ok(match receipt.delivery {
        CopyDelivery::Copied => Json(CopyResponse { tier: receipt.tier }).into_response(),
        CopyDelivery::ManualPage(page) => Html(page).into_response(),
    })
}

fn attachment(artifact: ExportArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    (
        [
            (header::CONTENT_TYPE, artifact.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
