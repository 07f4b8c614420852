//! Copy-to-clipboard for the HTML export, falling through progressively cruder tiers.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::export::html::to_html;
use crate::models::resume::ResumeRecord;
use crate::render::Theme;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKind {
    Native,
    LegacySelection,
    Manual,
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard command is empty")]
    EmptyCommand,

    #[error("clipboard command '{program}' failed: {reason}")]
    Command { program: String, reason: String },

    #[error("manual copy page is blocked")]
    ManualBlocked,

    #[error("no clipboard tier configured")]
    NoTiers,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyDelivery {
    /// The content is on the system clipboard.
    Copied,
    /// A page the user copies from by hand.
    ManualPage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReceipt {
    pub tier: TierKind,
    pub delivery: CopyDelivery,
}

#[async_trait]
pub trait ClipboardTier: Send + Sync {
    fn kind(&self) -> TierKind;

    async fn copy(&self, content: &str) -> Result<CopyDelivery, ClipboardError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Command tiers
// ────────────────────────────────────────────────────────────────────────────

/// Pipes content into an external clipboard program such as `wl-copy`.
pub struct CommandClipboard {
    kind: TierKind,
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Splits a command line on whitespace. No shell quoting is interpreted.
    pub fn from_command_line(kind: TierKind, command_line: &str) -> Result<Self, ClipboardError> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(ClipboardError::EmptyCommand)?;
        Ok(Self {
            kind,
            program,
            args: words.collect(),
        })
    }

    fn failure(&self, reason: impl Into<String>) -> ClipboardError {
        ClipboardError::Command {
            program: self.program.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ClipboardTier for CommandClipboard {
    fn kind(&self) -> TierKind {
        self.kind
    }

    async fn copy(&self, content: &str) -> Result<CopyDelivery, ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin unavailable"))?;
        stdin.write_all(content.as_bytes()).await?;
        drop(stdin);

        let output = tokio::time::timeout(COMMAND_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| self.failure(format!("timed out after {COMMAND_TIMEOUT:?}")))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{}: {}", output.status, stderr.trim())));
        }
        Ok(CopyDelivery::Copied)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Manual tier
// ────────────────────────────────────────────────────────────────────────────

/// Last resort: a standalone page presenting the markup in a textarea.
pub struct ManualCopyTier {
    enabled: bool,
}

impl ManualCopyTier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl ClipboardTier for ManualCopyTier {
    fn kind(&self) -> TierKind {
        TierKind::Manual
    }

    async fn copy(&self, content: &str) -> Result<CopyDelivery, ClipboardError> {
        if !self.enabled {
            return Err(ClipboardError::ManualBlocked);
        }
        Ok(CopyDelivery::ManualPage(manual_copy_page(content)))
    }
}

pub fn manual_copy_page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"><title>Resume HTML - Copy This Content</title></head>
<body>
<h3>Copy the HTML content below:</h3>
<textarea readonly style="width:100%;height:400px;font-family:monospace;font-size:12px;">{}</textarea>
<p><em>Select all text above and copy it manually (Ctrl+A, then Ctrl+C)</em></p>
</body>
</html>"#,
        html_escape::encode_text(content)
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Cascade
// ────────────────────────────────────────────────────────────────────────────

pub struct ClipboardCascade {
    tiers: Vec<Arc<dyn ClipboardTier>>,
}

impl ClipboardCascade {
    pub fn new(tiers: Vec<Arc<dyn ClipboardTier>>) -> Self {
        Self { tiers }
    }

    /// Native command, then the legacy selection command, then the manual page.
    /// A blank command line leaves its tier out.
    pub fn standard(native: &str, legacy: &str, manual_enabled: bool) -> Self {
        let commands = [(TierKind::Native, native), (TierKind::LegacySelection, legacy)];
        let mut tiers: Vec<Arc<dyn ClipboardTier>> = commands
            .into_iter()
            .filter_map(|(kind, line)| CommandClipboard::from_command_line(kind, line).ok())
            .map(|tier| Arc::new(tier) as Arc<dyn ClipboardTier>)
            .collect();
        tiers.push(Arc::new(ManualCopyTier::new(manual_enabled)));
        Self::new(tiers)
    }

    pub fn tiers(&self) -> impl Iterator<Item = TierKind> + '_ {
        self.tiers.iter().map(|t| t.kind())
    }

    pub async fn copy_html(&self, record: &ResumeRecord, theme: Theme) -> Result<CopyReceipt, ClipboardError> {
        self.copy(&to_html(record, theme)).await
    }

    /// Tries each tier in order. Only the last tier's error reaches the caller.
    pub async fn copy(&self, content: &str) -> Result<CopyReceipt, ClipboardError> {
        let mut last_error = ClipboardError::NoTiers;
        for tier in &self.tiers {
            match tier.copy(content).await {
                Ok(delivery) => {
                    info!(tier = ?tier.kind(), "Content copied");
                    return Ok(CopyReceipt {
                        tier: tier.kind(),
                        delivery,
                    });
                }
                Err(e) => {
                    if tier.kind() == TierKind::Native {
                        debug!(error = %e, "Native clipboard unavailable, falling back");
                    } else {
                        warn!(tier = ?tier.kind(), error = %e, "Clipboard tier failed");
                    }
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}
