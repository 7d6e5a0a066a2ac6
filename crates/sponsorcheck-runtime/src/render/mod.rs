//! Report artifacts.
//!
//! [`ReportWriter`] lays out a report, picks a collision-free file name in
//! the output directory and hands the document to a [`DocumentRenderer`].
//!
//! Renderers write to a `.part` file that is renamed into place only after
//! rendering succeeds, so a failed or abandoned render leaves no artifact.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use sponsorcheck_core::{ComplianceReport, ReportDocument, ReportLabels, ReportMetadata};

mod pdf;
mod text;

pub use pdf::{load_font_family, PdfRenderer};
pub use text::TextRenderer;

/// Errors from producing a report artifact.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font error: {0}")]
    Font(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Render task failed: {0}")]
    Task(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Render abandoned before completion")]
    Abandoned,
}

/// Writes a laid-out document to a file.
pub trait DocumentRenderer: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &ReportDocument, path: &Path) -> Result<(), RenderError>;
}

/// A written report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub file_name: String,
}

/// Owns the output directory and the renderer.
pub struct ReportWriter {
    output_dir: PathBuf,
    renderer: Arc<dyn DocumentRenderer>,
    labels: ReportLabels,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderer,
            labels: ReportLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Lay out and render one report, creating the output directory if needed.
    pub fn write(
        &self,
        metadata: &ReportMetadata,
        report: &ComplianceReport,
    ) -> Result<ReportArtifact, RenderError> {
        self.write_claimed(metadata, report, &RenderClaim::new())
    }

    /// Like [`write`](Self::write), but the artifact is published only if
    /// `claim` has not been abandoned by the time rendering finishes.
    pub fn write_claimed(
        &self,
        metadata: &ReportMetadata,
        report: &ComplianceReport,
        claim: &RenderClaim,
    ) -> Result<ReportArtifact, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = format!(
            "result_{}.{}",
            Uuid::now_v7().simple(),
            self.renderer.extension()
        );
        let path = self.output_dir.join(&file_name);
        let partial = self.output_dir.join(format!("{}.part", file_name));

        let document = ReportDocument::build(metadata, report, &self.labels);
        if let Err(e) = self.renderer.render(&document, &partial) {
            discard(&partial);
            return Err(e);
        }

        if !claim.publish() {
            discard(&partial);
            return Err(RenderError::Abandoned);
        }

        if let Err(e) = std::fs::rename(&partial, &path) {
            discard(&partial);
            return Err(e.into());
        }

        info!(path = %path.display(), "report written");
        Ok(ReportArtifact { path, file_name })
    }
}

fn discard(partial: &Path) {
    if std::fs::remove_file(partial).is_ok() {
        debug!(path = %partial.display(), "partial report removed");
    }
}

const CLAIM_PENDING: u8 = 0;
const CLAIM_PUBLISHED: u8 = 1;
const CLAIM_ABANDONED: u8 = 2;

/// Decides, exactly once, whether a render in flight may publish its artifact
/// or has been abandoned by its caller.
#[derive(Debug, Default)]
pub struct RenderClaim {
    state: AtomicU8,
}

impl RenderClaim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the renderer before publishing. False if already abandoned.
    pub fn publish(&self) -> bool {
        self.transition(CLAIM_PUBLISHED) || self.state.load(Ordering::Acquire) == CLAIM_PUBLISHED
    }

    /// Called by the caller when it stops waiting. False if the artifact is
    /// already being published.
    pub fn abandon(&self) -> bool {
        self.transition(CLAIM_ABANDONED) || self.state.load(Ordering::Acquire) == CLAIM_ABANDONED
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(CLAIM_PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sponsorcheck_core::{JudgeOutcome, RuleFindings, Synthesizer};

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            contract_title: "여름 협찬".to_string(),
            influencer_name: "김작가".to_string(),
            site_url: "https://blog.naver.com/demo/1".to_string(),
        }
    }

    fn report() -> ComplianceReport {
        let rules = RuleFindings {
            keyword_test: true,
            missing_keywords: vec![],
            word_count_test: true,
            image_count_test: true,
        };
        Synthesizer::new().synthesize(rules, JudgeOutcome::vacuous())
    }

    #[test]
    fn test_write_creates_directory_and_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("results");
        let writer = ReportWriter::new(&output, Arc::new(TextRenderer::new()));

        let first = writer.write(&metadata(), &report()).unwrap();
        let second = writer.write(&metadata(), &report()).unwrap();

        assert!(first.path.exists());
        assert!(second.path.exists());
        assert_ne!(first.file_name, second.file_name);
        assert!(first.file_name.starts_with("result_"));
        assert!(first.file_name.ends_with(".txt"));
        assert_eq!(first.path, output.join(&first.file_name));
    }

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn render(&self, _document: &ReportDocument, _path: &Path) -> Result<(), RenderError> {
            Err(RenderError::Pdf("boom".to_string()))
        }
    }

    #[test]
    fn test_renderer_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), Arc::new(FailingRenderer));

        let result = writer.write(&metadata(), &report());
        assert!(matches!(result, Err(RenderError::Pdf(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Writes part of the file, then fails, the way a PDF backend can.
    struct HalfWritingRenderer;

    impl DocumentRenderer for HalfWritingRenderer {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn render(&self, _document: &ReportDocument, path: &Path) -> Result<(), RenderError> {
            std::fs::write(path, b"%PDF-1.7 truncated")?;
            Err(RenderError::Pdf("font table missing glyph".to_string()))
        }
    }

    #[test]
    fn test_partial_file_removed_when_render_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), Arc::new(HalfWritingRenderer));

        assert!(writer.write(&metadata(), &report()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_abandoned_claim_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), Arc::new(TextRenderer::new()));
        let claim = RenderClaim::new();
        assert!(claim.abandon());

        let result = writer.write_claimed(&metadata(), &report(), &claim);
        assert!(matches!(result, Err(RenderError::Abandoned)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_claim_is_decided_once() {
        let claim = RenderClaim::new();
        assert!(claim.publish());
        assert!(!claim.abandon());
        assert!(claim.publish());

        let claim = RenderClaim::new();
        assert!(claim.abandon());
        assert!(!claim.publish());
    }
}
