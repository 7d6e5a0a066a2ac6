//! # sponsorcheck-core
//!
//! Deterministic building blocks for sponsored-post compliance verification.
//!
//! This crate answers, for one crawled post:
//! - Are all contractual keywords present?
//! - Is the post long enough, with enough images?
//! - What did the condition judge say, once its answer is parsed?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No I/O**: No network, no filesystem, no LLM calls
//! 3. **Self-consistent**: Report booleans are derived from the lists they summarize
//!
//! ## Example
//!
//! ```rust,ignore
//! use sponsorcheck_core::{evaluate, parse_judge_response, ExtractedContent, VerificationRequest};
//!
//! let request = VerificationRequest::from_json(body)?;
//! let content = ExtractedContent::new(post_text, image_count);
//! let judgement = parse_judge_response(&model_answer);
//!
//! let report = evaluate(&request, &content, judgement);
//! println!("compliant: {}", report.is_compliant());
//! ```

pub mod content;
pub mod report;
pub mod request;
pub mod rules;
pub mod synthesizer;
pub mod verdict;

// Re-export main types at crate root
pub use content::ExtractedContent;
pub use report::{Block, ReportDocument, ReportLabels, ReportLocale, ReportMetadata, SummaryTable};
pub use request::{RequestError, VerificationRequest};
pub use rules::{check_keywords, image_count_test, missing_keywords, word_count_test, RuleFindings};
pub use synthesizer::{ComplianceReport, Synthesizer};
pub use verdict::{
    parse_judge_response, parse_verdict_line, ConditionVerdict, JudgeOutcome, VERDICT_SEPARATOR,
};

/// Evaluate a request against extracted content and a judge outcome.
///
/// Runs every deterministic rule, then synthesizes the final report.
pub fn evaluate(
    request: &VerificationRequest,
    content: &ExtractedContent,
    judgement: JudgeOutcome,
) -> ComplianceReport {
    let rules = RuleFindings::evaluate(request, content);
    Synthesizer::new().synthesize(rules, judgement)
}

impl From<&VerificationRequest> for ReportMetadata {
    fn from(request: &VerificationRequest) -> Self {
        Self {
            contract_title: request.contract_title.clone(),
            influencer_name: request.influencer_name.clone(),
            site_url: request.site_url.clone(),
        }
    }
}
