//! Export orchestration: validation gate, simulated progress, dispatch and re-entry control.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::export::docx::DocxExporter;
use crate::export::html::HtmlExporter;
use crate::export::pdf::PdfExporter;
use crate::export::raster::Rasterizer;
use crate::export::validation::validate_for_export;
use crate::export::{DocumentExporter, ExportArtifact, ExportFormat, ExporterError};
use crate::models::resume::ResumeRecord;
use crate::render::Theme;

/// Number of equal progress increments between 0 and 100.
pub const PROGRESS_STEPS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Idle,
    Validating,
    Exporting,
}

/// How the most recent export attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastOutcome {
    Blocked { issues: Vec<String> },
    Complete { format: ExportFormat, filename: String },
    Failed { format: ExportFormat },
}

#[derive(Debug)]
pub enum ExportOutcome {
    Delivered(ExportArtifact),
    /// Another export was already running; nothing happened.
    Ignored,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("resume is incomplete: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{format} export failed")]
    RenderFailure {
        format: ExportFormat,
        #[source]
        source: ExporterError,
    },
}

/// One exporter per format.
#[derive(Clone)]
pub struct Exporters {
    pub html: Arc<dyn DocumentExporter>,
    pub pdf: Arc<dyn DocumentExporter>,
    pub docx: Arc<dyn DocumentExporter>,
}

impl Exporters {
    /// The production set: in-process HTML and DOCX, PDF through `rasterizer`.
    pub fn standard(rasterizer: Arc<dyn Rasterizer>, settle: Duration) -> Self {
        Self {
            html: Arc::new(HtmlExporter),
            pdf: Arc::new(PdfExporter::new(rasterizer, settle)),
            docx: Arc::new(DocxExporter),
        }
    }

    pub fn get(&self, format: ExportFormat) -> &Arc<dyn DocumentExporter> {
        match format {
            ExportFormat::Html => &self.html,
            ExportFormat::Pdf => &self.pdf,
            ExportFormat::Docx => &self.docx,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot {
    pub status: ExportStatus,
    pub progress: u8,
    pub last_outcome: Option<LastOutcome>,
}

#[derive(Debug)]
struct Inner {
    status: ExportStatus,
    last_outcome: Option<LastOutcome>,
}

/// Serializes exports for one editing session.
pub struct ExportOrchestrator {
    exporters: Exporters,
    inner: Mutex<Inner>,
    /// Percent complete; keeps the last published value between exports.
    progress: watch::Sender<u8>,
}

/// Returns the orchestrator to `Idle` when dropped, including when the export future is.
struct BusyGuard<'a> {
    orchestrator: &'a ExportOrchestrator,
}

impl BusyGuard<'_> {
    fn advance(&self, status: ExportStatus) {
        self.orchestrator.lock().status = status;
    }

    fn settle(self, outcome: LastOutcome) {
        self.orchestrator.lock().last_outcome = Some(outcome);
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.lock().status = ExportStatus::Idle;
    }
}

impl ExportOrchestrator {
    pub fn new(exporters: Exporters) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            exporters,
            inner: Mutex::new(Inner {
                status: ExportStatus::Idle,
                last_outcome: None,
            }),
            progress,
        }
    }

    pub fn status(&self) -> ExportStatus {
        self.lock().status
    }

    pub fn snapshot(&self) -> ExportSnapshot {
        let inner = self.lock();
        ExportSnapshot {
            status: inner.status,
            progress: *self.progress.borrow(),
            last_outcome: inner.last_outcome.clone(),
        }
    }

    /// Runs one export end to end.
    ///
    /// Returns `Ignored` without touching any state if an export is already in flight.
    /// Validation failures return every issue and never reach an exporter.
    pub async fn export(
        &self,
        record: &ResumeRecord,
        theme: Theme,
        format: ExportFormat,
    ) -> Result<ExportOutcome, ExportError> {
        let Some(guard) = self.try_begin() else {
            debug!(%format, "Export already in progress, ignoring");
            return Ok(ExportOutcome::Ignored);
        };

        let report = validate_for_export(record);
        if !report.complete {
            info!(issues = report.issues.len(), "Export blocked by incomplete resume");
            guard.settle(LastOutcome::Blocked {
                issues: report.issues.clone(),
            });
            return Err(ExportError::Validation(report.issues));
        }

        guard.advance(ExportStatus::Exporting);
        self.progress.send_replace(0);
        self.simulate_progress(format.nominal_duration()).await;

        let exporter = self.exporters.get(format);
        debug!(exporter = %exporter.format(), %theme, "Dispatching export");
        match exporter.export(record, theme).await {
            Ok(artifact) => {
                info!(%format, %theme, filename = %artifact.filename, "Export complete");
                guard.settle(LastOutcome::Complete {
                    format,
                    filename: artifact.filename.clone(),
                });
                Ok(ExportOutcome::Delivered(artifact))
            }
            Err(source) => {
                error!(%format, %theme, error = %source, "Export failed");
                self.progress.send_replace(0);
                guard.settle(LastOutcome::Failed { format });
                Err(ExportError::RenderFailure { format, source })
            }
        }
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        let mut inner = self.lock();
        if inner.status != ExportStatus::Idle {
            return None;
        }
        inner.status = ExportStatus::Validating;
        Some(BusyGuard { orchestrator: self })
    }

    /// Publishes 10, 20, ... 100 at even intervals across `duration`.
    async fn simulate_progress(&self, duration: Duration) {
        let step = duration / u32::from(PROGRESS_STEPS);
        for i in 1..=PROGRESS_STEPS {
            tokio::time::sleep(step).await;
            self.progress.send_replace(i * (100 / PROGRESS_STEPS));
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::export::raster::RasterError;
    use crate::models::resume::{ExperienceEntry, SkillItem};

    /// Counts invocations; optionally fails or waits on a gate before returning.
    struct FakeExporter {
        format: ExportFormat,
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl FakeExporter {
        fn new(format: ExportFormat) -> Arc<Self> {
            Arc::new(Self {
                format,
                calls: AtomicUsize::new(0),
                fail: false,
                gate: None,
            })
        }

        fn failing(format: ExportFormat) -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Arc::into_inner(Self::new(format)).unwrap()
            })
        }

        fn gated(format: ExportFormat, gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                gate: Some(gate),
                ..Arc::into_inner(Self::new(format)).unwrap()
            })
        }
    }

    #[async_trait]
    impl DocumentExporter for FakeExporter {
        fn format(&self) -> ExportFormat {
            self.format
        }

        async fn export(
            &self,
            record: &ResumeRecord,
            theme: Theme,
        ) -> Result<ExportArtifact, ExporterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(RasterError::Process("boom".to_string()).into());
            }
            Ok(ExportArtifact::new(record, theme, self.format, b"ok".to_vec()))
        }
    }

    fn make_exporters(
        html: Arc<FakeExporter>,
        pdf: Arc<FakeExporter>,
        docx: Arc<FakeExporter>,
    ) -> Exporters {
        Exporters { html, pdf, docx }
    }

    fn make_fakes() -> (Arc<FakeExporter>, Arc<FakeExporter>, Arc<FakeExporter>) {
        (
            FakeExporter::new(ExportFormat::Html),
            FakeExporter::new(ExportFormat::Pdf),
            FakeExporter::new(ExportFormat::Docx),
        )
    }

    fn make_record() -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.personal_info.full_name = "Barbara Liskov".to_string();
        record.personal_info.email = "liskov@mit.edu".to_string();
        record.experience.push(ExperienceEntry::default());
        record.skills.technical.push(SkillItem::new("CLU", 5));
        record
    }

    async fn wait_for_status(orchestrator: &ExportOrchestrator, status: ExportStatus) {
        while orchestrator.status() != status {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_record_never_reaches_exporter() {
        let (html, pdf, docx) = make_fakes();
        let orchestrator = ExportOrchestrator::new(make_exporters(html, pdf.clone(), docx));

        let mut record = make_record();
        record.personal_info.full_name.clear();
        record.personal_info.email = "  ".to_string();

        let err = orchestrator
            .export(&record, Theme::Modern, ExportFormat::Pdf)
            .await
            .unwrap_err();
        match err {
            ExportError::Validation(issues) => assert_eq!(
                issues,
                vec!["Full name is required", "Email address is required"]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }

        assert_eq!(pdf.calls.load(Ordering::SeqCst), 0);
        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.status, ExportStatus::Idle);
        assert_eq!(snapshot.progress, 0);
        assert!(matches!(snapshot.last_outcome, Some(LastOutcome::Blocked { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatches_by_format_and_delivers() {
        let (html, pdf, docx) = make_fakes();
        let orchestrator =
            ExportOrchestrator::new(make_exporters(html.clone(), pdf.clone(), docx.clone()));

        let outcome = orchestrator
            .export(&make_record(), Theme::Creative, ExportFormat::Docx)
            .await
            .unwrap();

        let ExportOutcome::Delivered(artifact) = outcome else {
            panic!("expected a delivered artifact");
        };
        assert_eq!(artifact.filename, "barbara-liskov-resume-creative.docx");
        assert_eq!(docx.calls.load(Ordering::SeqCst), 1);
        assert_eq!(html.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pdf.calls.load(Ordering::SeqCst), 0);

        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.status, ExportStatus::Idle);
        assert_eq!(snapshot.progress, 100);
        assert_eq!(
            snapshot.last_outcome,
            Some(LastOutcome::Complete {
                format: ExportFormat::Docx,
                filename: "barbara-liskov-resume-creative.docx".to_string(),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_takes_nominal_duration() {
        let (html, pdf, docx) = make_fakes();
        let orchestrator = Arc::new(ExportOrchestrator::new(make_exporters(html, pdf, docx)));

        let mut rx = orchestrator.progress.subscribe();
        let watcher = tokio::spawn(async move {
            let mut seen = vec![*rx.borrow_and_update()];
            while rx.changed().await.is_ok() {
                let value = *rx.borrow_and_update();
                seen.push(value);
                if value == 100 {
                    break;
                }
            }
            seen
        });

        let started = tokio::time::Instant::now();
        orchestrator
            .export(&make_record(), Theme::Professional, ExportFormat::Pdf)
            .await
            .unwrap();
        assert!(started.elapsed() >= ExportFormat::Pdf.nominal_duration());

        let seen = watcher.await.unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {seen:?}");
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.iter().all(|p| p % 10 == 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resets_progress_and_returns_to_idle() {
        let (html, _, docx) = make_fakes();
        let pdf = FakeExporter::failing(ExportFormat::Pdf);
        let orchestrator = ExportOrchestrator::new(make_exporters(html, pdf, docx));

        let err = orchestrator
            .export(&make_record(), Theme::Modern, ExportFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExportError::RenderFailure {
                format: ExportFormat::Pdf,
                ..
            }
        ));

        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.status, ExportStatus::Idle);
        assert_eq!(snapshot.progress, 0);
        assert_eq!(
            snapshot.last_outcome,
            Some(LastOutcome::Failed {
                format: ExportFormat::Pdf
            })
        );

        // Retry is allowed straight away.
        assert!(orchestrator
            .export(&make_record(), Theme::Modern, ExportFormat::Html)
            .await
            .is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentry_while_exporting_is_ignored() {
        let gate = Arc::new(Notify::new());
        let (_, pdf, docx) = make_fakes();
        let html = FakeExporter::gated(ExportFormat::Html, gate.clone());
        let orchestrator = Arc::new(ExportOrchestrator::new(make_exporters(
            html.clone(),
            pdf,
            docx,
        )));

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .export(&make_record(), Theme::Professional, ExportFormat::Html)
                    .await
            })
        };
        wait_for_status(&orchestrator, ExportStatus::Exporting).await;

        let before = orchestrator.snapshot();
        let second = orchestrator
            .export(&make_record(), Theme::Professional, ExportFormat::Html)
            .await
            .unwrap();
        assert!(matches!(second, ExportOutcome::Ignored));
        assert_eq!(orchestrator.status(), ExportStatus::Exporting);
        assert_eq!(orchestrator.snapshot().last_outcome, before.last_outcome);

        // Stores a permit if the exporter has not started waiting yet.
        gate.notify_one();

        let delivered = first.await.unwrap().unwrap();
        assert!(matches!(delivered, ExportOutcome::Delivered(_)));
        assert_eq!(html.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.status(), ExportStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_export_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let (_, pdf, docx) = make_fakes();
        let html = FakeExporter::gated(ExportFormat::Html, gate);
        let orchestrator = Arc::new(ExportOrchestrator::new(make_exporters(html, pdf, docx)));

        let task = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .export(&make_record(), Theme::Modern, ExportFormat::Html)
                    .await
            })
        };
        wait_for_status(&orchestrator, ExportStatus::Exporting).await;

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(orchestrator.status(), ExportStatus::Idle);
    }
}
