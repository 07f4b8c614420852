//! Document export: HTML, PDF and DOCX artifacts from a `ResumeRecord`.
//!
//! Each format has one `DocumentExporter` implementation. The orchestrator owns
//! validation, progress and re-entry; exporters only turn a record into bytes.

pub mod clipboard;
pub mod color;
pub mod docx;
pub mod filename;
pub mod handlers;
pub mod html;
pub mod orchestrator;
pub mod pdf;
pub mod raster;
pub mod sessions;
pub mod validation;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeRecord;
use crate::render::Theme;

pub use orchestrator::{ExportError, ExportOutcome, Exporters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Html, ExportFormat::Pdf, ExportFormat::Docx];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// How long the simulated progress bar takes to fill for this format.
    pub fn nominal_duration(&self) -> Duration {
        match self {
            ExportFormat::Html => Duration::from_millis(1000),
            ExportFormat::Docx => Duration::from_millis(1500),
            ExportFormat::Pdf => Duration::from_millis(2000),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown export format '{s}'"))
    }
}

/// A finished file ready to hand to the user.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(record: &ResumeRecord, theme: Theme, format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename::export_filename(&record.personal_info.full_name, theme, format),
            mime_type: format.mime_type(),
            bytes,
        }
    }
}

/// Underlying cause of a failed export. Logged, never shown to the end user verbatim.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("rasterization failed: {0}")]
    Raster(#[from] raster::RasterError),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("zip packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// One implementation per `ExportFormat`.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    async fn export(
        &self,
        record: &ResumeRecord,
        theme: Theme,
    ) -> Result<ExportArtifact, ExporterError>;
}
