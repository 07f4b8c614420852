use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::clipboard::ClipboardError;
use crate::export::ExportError;

/// Shown to the user for every render failure; the cause is only logged.
pub const EXPORT_FAILED_MESSAGE: &str = "Export failed. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resume is incomplete")]
    Incomplete(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Export failed")]
    ExportFailed,

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Validation(issues) => AppError::Incomplete(issues),
            // Already logged with its cause by the orchestrator.
            ExportError::RenderFailure { .. } => AppError::ExportFailed,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Incomplete(issues) => (
                StatusCode::BAD_REQUEST,
                "INCOMPLETE_RESUME",
                issues.join("; "),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::ExportFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EXPORT_FAILED",
                EXPORT_FAILED_MESSAGE.to_string(),
            ),
            AppError::Clipboard(e) => {
                tracing::error!("Clipboard error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CLIPBOARD_ERROR",
                    "Unable to copy to clipboard. Please allow popups to copy content.".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Incomplete(issues) = &self {
            error["issues"] = json!(issues);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
