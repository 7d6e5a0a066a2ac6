//! Verification pipeline.
//!
//! One request moves through
//! `Received → Extracted → Evaluated → Reported → Completed`.
//! Any stage failure ends the request in `Failed` with no partial result:
//! - Extraction runs first; nothing else starts without content
//! - Rule evaluation and the condition judge then run concurrently via
//!   `tokio::join!`, both reading the same immutable content
//! - The report is synthesized, then rendered on a blocking thread
//!
//! The judge call and the render are each bounded by a timeout, as is
//! extraction. There are no retries. A render that outlives its timeout is
//! abandoned and publishes no artifact.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use sponsorcheck_core::{
    ComplianceReport, ExtractedContent, JudgeOutcome, ReportMetadata, RuleFindings, Synthesizer,
    VerificationRequest,
};

use crate::extractor::{ContentExtractor, CrawlError};
use crate::judge::{ConditionJudge, JudgeError};
use crate::render::{RenderClaim, RenderError, ReportArtifact, ReportWriter};
use crate::RuntimeError;

/// Which part of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Crawl,
    Judge,
    Report,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Crawl => write!(f, "crawl"),
            FailureKind::Judge => write!(f, "judge"),
            FailureKind::Report => write!(f, "report"),
        }
    }
}

/// Lifecycle of one verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Extracted,
    Evaluated,
    Reported,
    Completed,
    Failed(FailureKind),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed(_))
    }
}

/// A fatal pipeline failure, classified by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("crawl failed: {0}")]
    Crawl(#[from] CrawlError),

    #[error("condition judge failed: {0}")]
    Judge(#[from] JudgeError),

    #[error("report generation failed: {0}")]
    Report(#[from] RenderError),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Crawl(_) => FailureKind::Crawl,
            PipelineError::Judge(_) => FailureKind::Judge,
            PipelineError::Report(_) => FailureKind::Report,
        }
    }

    /// The terminal stage this error leaves the request in.
    pub fn stage(&self) -> Stage {
        Stage::Failed(self.kind())
    }
}

/// Result of a completed request.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub report: ComplianceReport,
    pub artifact: ReportArtifact,
}

/// Per-stage time limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub extract: Duration,
    pub judge: Duration,
    pub render: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            extract: Duration::from_secs(30),
            judge: Duration::from_secs(60),
            render: Duration::from_secs(30),
        }
    }
}

/// Runs verification requests. Shared by all requests; holds no per-request state.
pub struct VerificationPipeline {
    extractor: Arc<dyn ContentExtractor>,
    judge: Arc<dyn ConditionJudge>,
    writer: Arc<ReportWriter>,
    synthesizer: Synthesizer,
    timeouts: StageTimeouts,
}

impl VerificationPipeline {
    pub fn builder() -> VerificationPipelineBuilder {
        VerificationPipelineBuilder::new()
    }

    /// Verify one post against its request.
    pub async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationOutcome, PipelineError> {
        let mut stage = Stage::Received;
        info!(url = %request.site_url, conditions = request.conditions.len(), "verification received");

        match self.run(request, &mut stage).await {
            Ok(outcome) => {
                advance(&mut stage, Stage::Completed);
                info!(
                    compliant = outcome.report.is_compliant(),
                    artifact = %outcome.artifact.file_name,
                    "verification completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(from = ?stage, stage = %e.kind(), error = %e, "verification failed");
                advance(&mut stage, e.stage());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &VerificationRequest,
        stage: &mut Stage,
    ) -> Result<VerificationOutcome, PipelineError> {
        let content = self.extract(&request.site_url).await?;
        advance(stage, Stage::Extracted);

        let (rules, judgement) = tokio::join!(
            async { RuleFindings::evaluate(request, &content) },
            self.judge_conditions(&content, &request.conditions),
        );
        let report = self.synthesizer.synthesize(rules, judgement?);
        advance(stage, Stage::Evaluated);

        let artifact = self.render(ReportMetadata::from(request), report.clone()).await?;
        advance(stage, Stage::Reported);

        Ok(VerificationOutcome { report, artifact })
    }

    async fn extract(&self, url: &str) -> Result<ExtractedContent, CrawlError> {
        let limit = self.timeouts.extract;
        tokio::time::timeout(limit, self.extractor.extract(url))
            .await
            .map_err(|_| CrawlError::Timeout(limit))?
    }

    async fn judge_conditions(
        &self,
        content: &ExtractedContent,
        conditions: &[String],
    ) -> Result<JudgeOutcome, JudgeError> {
        let limit = self.timeouts.judge;
        tokio::time::timeout(limit, self.judge.judge(&content.text, conditions))
            .await
            .map_err(|_| JudgeError::Timeout(limit))?
    }

    async fn render(
        &self,
        metadata: ReportMetadata,
        report: ComplianceReport,
    ) -> Result<ReportArtifact, RenderError> {
        let limit = self.timeouts.render;
        let writer = Arc::clone(&self.writer);
        let claim = Arc::new(RenderClaim::new());
        let task_claim = Arc::clone(&claim);
        let mut task = tokio::task::spawn_blocking(move || {
            writer.write_claimed(&metadata, &report, &task_claim)
        });

        let joined = match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            // The blocking render cannot be stopped; it discards its file itself.
            Err(_) if claim.abandon() => return Err(RenderError::Timeout(limit)),
            // Already publishing: the rename is the only step left.
            Err(_) => task.await,
        };

        joined.map_err(|join_error| RenderError::Task(join_error.to_string()))?
    }

    /// Whether the judge backend looks usable.
    pub async fn judge_healthy(&self) -> bool {
        self.judge.health_check().await
    }

    pub fn judge_name(&self) -> &str {
        self.judge.name()
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = ?*stage, to = ?next, "stage transition");
    *stage = next;
}

/// Builder for [`VerificationPipeline`].
pub struct VerificationPipelineBuilder {
    extractor: Option<Arc<dyn ContentExtractor>>,
    judge: Option<Arc<dyn ConditionJudge>>,
    writer: Option<Arc<ReportWriter>>,
    timeouts: StageTimeouts,
}

impl VerificationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            extractor: None,
            judge: None,
            writer: None,
            timeouts: StageTimeouts::default(),
        }
    }

    pub fn extractor(mut self, extractor: Arc<dyn ContentExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn judge(mut self, judge: Arc<dyn ConditionJudge>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn writer(mut self, writer: ReportWriter) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    pub fn timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn build(self) -> Result<VerificationPipeline, RuntimeError> {
        let extractor = self
            .extractor
            .ok_or_else(|| RuntimeError::NotConfigured("No content extractor set".to_string()))?;
        let judge = self
            .judge
            .ok_or_else(|| RuntimeError::NotConfigured("No condition judge set".to_string()))?;
        let writer = self
            .writer
            .ok_or_else(|| RuntimeError::NotConfigured("No report writer set".to_string()))?;

        Ok(VerificationPipeline {
            extractor,
            judge,
            writer,
            synthesizer: Synthesizer::new(),
            timeouts: self.timeouts,
        })
    }
}

impl Default for VerificationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
