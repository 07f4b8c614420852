use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; a malformed value is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Headless Chromium binary used to rasterize PDF pages.
    pub chromium_path: String,
    /// Delay between mounting the offscreen document and capturing it.
    pub raster_settle: Duration,
    pub raster_timeout: Duration,
    pub clipboard_command: String,
    pub legacy_clipboard_command: String,
    /// When false the manual copy page is treated as blocked.
    pub manual_copy_enabled: bool,
    /// Idle export sessions older than this are dropped.
    pub session_idle_ttl: Duration,
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            chromium_path: "chromium".to_string(),
            raster_settle: Duration::from_millis(1000),
            raster_timeout: Duration::from_secs(15),
            clipboard_command: "wl-copy".to_string(),
            legacy_clipboard_command: "xclip -selection clipboard".to_string(),
            manual_copy_enabled: true,
            session_idle_ttl: Duration::from_secs(30 * 60),
            max_sessions: 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: string_env("RUST_LOG", defaults.rust_log),
            chromium_path: string_env("CHROMIUM_PATH", defaults.chromium_path),
            raster_settle: Duration::from_millis(parse_env(
                "RASTER_SETTLE_MS",
                defaults.raster_settle.as_millis() as u64,
            )?),
            raster_timeout: Duration::from_secs(parse_env(
                "RASTER_TIMEOUT_SECS",
                defaults.raster_timeout.as_secs(),
            )?),
            clipboard_command: string_env("CLIPBOARD_COMMAND", defaults.clipboard_command),
            legacy_clipboard_command: string_env(
                "LEGACY_CLIPBOARD_COMMAND",
                defaults.legacy_clipboard_command,
            ),
            manual_copy_enabled: parse_env("MANUAL_COPY_ENABLED", defaults.manual_copy_enabled)?,
            session_idle_ttl: Duration::from_secs(parse_env(
                "SESSION_IDLE_TTL_SECS",
                defaults.session_idle_ttl.as_secs(),
            )?),
            max_sessions: parse_env("MAX_SESSIONS", defaults.max_sessions)?,
        })
    }
}

fn string_env(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
