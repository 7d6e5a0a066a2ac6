//! # sponsorcheck-runtime
//!
//! Everything in verification that touches the outside world: fetching the
//! post, asking a language model about the free-text conditions, and writing
//! the report file.
//!
//! The deterministic checks live in `sponsorcheck-core`; this crate wires
//! them into a [`VerificationPipeline`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use sponsorcheck_runtime::{build_pipeline, ProviderRegistry, RuntimeConfig};
//!
//! let pipeline = build_pipeline(&RuntimeConfig::default(), &ProviderRegistry::with_defaults())?;
//! let outcome = pipeline.verify(&request).await?;
//! println!("{}", outcome.artifact.file_name);
//! ```

use thiserror::Error;

pub mod config;
pub mod extractor;
pub mod judge;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod render;

pub use config::{
    ConfigError, ExtractorConfig, JudgeConfig, LlmConfig, ReportConfig, ReportFormat,
    ResponseFormat, RuntimeConfig,
};
pub use extractor::{ContentExtractor, CrawlError};
pub use judge::{ConditionJudge, JudgeError, LlmJudge};
pub use orchestrator::{
    FailureKind, PipelineError, Stage, StageTimeouts, VerificationOutcome, VerificationPipeline,
    VerificationPipelineBuilder,
};
pub use providers::{LlmProvider, ProviderError, ProviderRegistry};
pub use render::{
    DocumentRenderer, PdfRenderer, RenderClaim, RenderError, ReportArtifact, ReportWriter,
    TextRenderer,
};

#[cfg(feature = "http-extractor")]
pub use extractor::BlogExtractor;

/// Errors from assembling the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Report renderer setup failed: {0}")]
    Render(#[from] RenderError),
}

impl From<&RuntimeConfig> for StageTimeouts {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            extract: config.extractor.timeout,
            judge: config.llm.timeout,
            render: config.report.timeout,
        }
    }
}

/// Build the report writer for a config. Loads the PDF font here, once.
pub fn build_writer(config: &ReportConfig) -> Result<ReportWriter, RuntimeError> {
    let renderer: std::sync::Arc<dyn DocumentRenderer> = match config.format {
        ReportFormat::Pdf => std::sync::Arc::new(PdfRenderer::from_font_file(&config.font_path)?),
        ReportFormat::Text => std::sync::Arc::new(TextRenderer::new()),
    };

    Ok(ReportWriter::new(&config.output_dir, renderer)
        .with_labels(sponsorcheck_core::ReportLabels::for_locale(config.locale)))
}

/// Build the LLM judge for a config.
pub fn build_judge(
    config: &RuntimeConfig,
    registry: &ProviderRegistry,
) -> Result<LlmJudge, RuntimeError> {
    let provider = registry.create(&config.llm.provider, &config.llm.provider_settings())?;
    tracing::info!(provider = provider.name(), model = %config.llm.model, "LLM provider ready");

    Ok(LlmJudge::new(provider, config.llm.completion()).with_config(config.judge.clone()))
}

/// Assemble a pipeline with the HTTP extractor and the configured judge and renderer.
#[cfg(feature = "http-extractor")]
pub fn build_pipeline(
    config: &RuntimeConfig,
    registry: &ProviderRegistry,
) -> Result<VerificationPipeline, RuntimeError> {
    config.validate()?;

    VerificationPipeline::builder()
        .extractor(std::sync::Arc::new(BlogExtractor::new(config.extractor.clone())))
        .judge(std::sync::Arc::new(build_judge(config, registry)?))
        .writer(build_writer(&config.report)?)
        .timeouts(StageTimeouts::from(config))
        .build()
}
