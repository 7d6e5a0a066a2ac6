//! Synthesizer: combines rule findings and the judge outcome into the
//! final compliance report.
//!
//! The aggregation is fixed:
//! 1. `keyword_test` is true iff no keyword is missing
//! 2. `condition_test` is true iff every condition verdict is "yes"
//!    (vacuously true when there are none)
//! 3. Volume checks are carried over unchanged

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::RuleFindings;
use crate::verdict::{ConditionVerdict, JudgeOutcome};

/// The aggregate result of all checks for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub keyword_test: bool,
    pub condition_test: bool,
    pub word_count_test: bool,
    pub image_count_test: bool,
    pub missing_keywords: Vec<String>,
    #[serde(rename = "conditionDetail")]
    pub condition_details: Vec<ConditionVerdict>,
    pub evaluated_at: DateTime<Utc>,
}

impl ComplianceReport {
    /// True when every check passed.
    pub fn is_compliant(&self) -> bool {
        self.keyword_test && self.condition_test && self.word_count_test && self.image_count_test
    }
}

/// The Synthesizer aggregates findings into a [`ComplianceReport`].
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize rule findings and the judge outcome into a report.
    ///
    /// Both booleans are re-derived from the lists they summarize so the
    /// report can never disagree with its own details.
    pub fn synthesize(&self, rules: RuleFindings, judgement: JudgeOutcome) -> ComplianceReport {
        let condition_test = judgement.details.iter().all(ConditionVerdict::passed);

        if condition_test != judgement.all_passed {
            tracing::warn!(
                reported = judgement.all_passed,
                derived = condition_test,
                "Judge outcome disagreed with its details; using details"
            );
        }

        ComplianceReport {
            keyword_test: rules.missing_keywords.is_empty(),
            condition_test,
            word_count_test: rules.word_count_test,
            image_count_test: rules.image_count_test,
            missing_keywords: rules.missing_keywords,
            condition_details: judgement.details,
            evaluated_at: Utc::now(),
        }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}
