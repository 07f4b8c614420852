use std::sync::Arc;

use crate::config::Config;
use crate::export::clipboard::ClipboardCascade;
use crate::export::raster::ChromiumRasterizer;
use crate::export::sessions::{ExportSessions, SessionLimits};
use crate::export::Exporters;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ExportSessions>,
    pub clipboard: Arc<ClipboardCascade>,
}

impl AppState {
    pub fn new(config: &Config, exporters: Exporters, clipboard: ClipboardCascade) -> Self {
        let limits = SessionLimits {
            idle_ttl: config.session_idle_ttl,
            max_sessions: config.max_sessions,
        };
        Self {
            sessions: Arc::new(ExportSessions::new(exporters, limits)),
            clipboard: Arc::new(clipboard),
        }
    }

    /// Production wiring: Chromium-backed PDF and the command clipboard cascade.
    pub fn from_config(config: &Config) -> Self {
        let rasterizer = Arc::new(ChromiumRasterizer::new(
            config.chromium_path.clone(),
            config.raster_settle,
            config.raster_timeout,
        ));
        let exporters = Exporters::standard(rasterizer, config.raster_settle);
        let clipboard = ClipboardCascade::standard(
            &config.clipboard_command,
            &config.legacy_clipboard_command,
            config.manual_copy_enabled,
        );
        Self::new(config, exporters, clipboard)
    }
}
