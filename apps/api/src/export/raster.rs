//! Offscreen mounting and bitmap capture of HTML documents.
//!
//! A mounted document is a uniquely owned surface. Callers must hand every handle back to
//! `unmount`, including on failure paths.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, RgbaImage};
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

/// CSS reference resolution.
pub const CSS_DPI: f32 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// US letter (8.5×11 in) at 96 DPI.
    pub const LETTER: Viewport = Viewport {
        width: 816,
        height: 1056,
    };

    pub fn scaled(&self, scale: u32) -> (u32, u32) {
        (self.width * scale, self.height * scale)
    }
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("failed to mount offscreen document: {0}")]
    Mount(String),

    #[error("rasterizer process failed: {0}")]
    Process(String),

    #[error("rasterizer timed out after {0:?}")]
    Timeout(Duration),

    #[error("captured bitmap could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document mounted offscreen at a fixed viewport.
#[derive(Debug)]
pub struct MountHandle {
    pub id: Uuid,
    pub viewport: Viewport,
    /// Backing file for engines that load documents from disk.
    pub document: Option<PathBuf>,
    scratch: Option<TempDir>,
}

impl MountHandle {
    /// A surface with no filesystem backing.
    #[cfg(test)]
    pub fn detached(viewport: Viewport) -> Self {
        Self {
            id: Uuid::new_v4(),
            viewport,
            document: None,
            scratch: None,
        }
    }

    fn on_disk(viewport: Viewport, scratch: TempDir, document: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            viewport,
            document: Some(document),
            scratch: Some(scratch),
        }
    }
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn mount(&self, html: &str, viewport: Viewport) -> Result<MountHandle, RasterError>;

    /// Captures the mounted surface at `scale` device pixels per CSS pixel.
    async fn capture(&self, handle: &MountHandle, scale: u32) -> Result<RgbaImage, RasterError>;

    async fn unmount(&self, handle: MountHandle);
}

// ────────────────────────────────────────────────────────────────────────────
// Headless Chromium
// ────────────────────────────────────────────────────────────────────────────

/// Rasterizes by screenshotting the document with a headless Chromium binary.
///
/// The offscreen surface is a scratch directory holding `index.html`; the screenshot is
/// taken of exactly the viewport, so anything below the fold is not captured.
pub struct ChromiumRasterizer {
    binary: PathBuf,
    /// Virtual time granted to the page for font loading before the screenshot.
    settle: Duration,
    timeout: Duration,
}

impl ChromiumRasterizer {
    pub fn new(binary: impl Into<PathBuf>, settle: Duration, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            settle,
            timeout,
        }
    }
}

#[async_trait]
impl Rasterizer for ChromiumRasterizer {
    async fn mount(&self, html: &str, viewport: Viewport) -> Result<MountHandle, RasterError> {
        let scratch = tempfile::Builder::new()
            .prefix("vitae-offscreen-")
            .tempdir()
            .map_err(|e| RasterError::Mount(e.to_string()))?;
        let document = scratch.path().join("index.html");
        tokio::fs::write(&document, html).await?;

        let handle = MountHandle::on_disk(viewport, scratch, document);
        debug!(surface = %handle.id, "Mounted offscreen document");
        Ok(handle)
    }

    async fn capture(&self, handle: &MountHandle, scale: u32) -> Result<RgbaImage, RasterError> {
        let document = handle
            .document
            .as_ref()
            .ok_or_else(|| RasterError::Mount("surface has no backing document".to_string()))?;
        let screenshot = document.with_file_name("capture.png");

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--default-background-color=ffffffff")
            .arg(format!(
                "--window-size={},{}",
                handle.viewport.width, handle.viewport.height
            ))
            .arg(format!("--force-device-scale-factor={scale}"))
            .arg(format!("--virtual-time-budget={}", self.settle.as_millis()))
            .arg(format!("--screenshot={}", screenshot.display()))
            .arg(format!("file://{}", document.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RasterError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(RasterError::Process(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let png = tokio::fs::read(&screenshot).await?;
        let bitmap = tokio::task::spawn_blocking(move || {
            image::load_from_memory_with_format(&png, ImageFormat::Png).map(|img| img.to_rgba8())
        })
        .await
        .map_err(|e| RasterError::Process(e.to_string()))??;

        debug!(
            surface = %handle.id,
            width = bitmap.width(),
            height = bitmap.height(),
            "Captured offscreen document"
        );
        Ok(bitmap)
    }

    async fn unmount(&self, handle: MountHandle) {
        let id = handle.id;
        if let Some(scratch) = handle.scratch {
            if let Err(e) = scratch.close() {
                warn!(surface = %id, "Failed to remove offscreen scratch directory: {e}");
            }
        }
        debug!(surface = %id, "Unmounted offscreen document");
    }
}
