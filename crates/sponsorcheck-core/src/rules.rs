//! Deterministic rule checks.
//!
//! Keyword coverage is plain case-folded substring containment: no
//! tokenization, no stemming. Volume checks are inclusive thresholds.
//! Every function here is total and side-effect free.

use serde::{Deserialize, Serialize};

use crate::content::ExtractedContent;
use crate::request::VerificationRequest;

/// True iff every keyword occurs in `content`, ignoring case.
pub fn check_keywords(content: &str, keywords: &[String]) -> bool {
    let haystack = content.to_lowercase();
    keywords
        .iter()
        .all(|keyword| haystack.contains(&keyword.to_lowercase()))
}

/// Keywords that do not occur in `content`, ignoring case.
///
/// Output keeps the caller's casing and order; repeated keywords are
/// reported once.
pub fn missing_keywords(content: &str, keywords: &[String]) -> Vec<String> {
    let haystack = content.to_lowercase();
    let mut missing: Vec<String> = Vec::new();

    for keyword in keywords {
        if haystack.contains(&keyword.to_lowercase()) || missing.contains(keyword) {
            continue;
        }
        missing.push(keyword.clone());
    }

    missing
}

/// Minimum text length check.
pub fn word_count_test(char_count: usize, threshold: usize) -> bool {
    char_count >= threshold
}

/// Minimum image count check.
pub fn image_count_test(image_count: usize, threshold: usize) -> bool {
    image_count >= threshold
}

/// Results of all deterministic checks for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleFindings {
    pub keyword_test: bool,
    pub missing_keywords: Vec<String>,
    pub word_count_test: bool,
    pub image_count_test: bool,
}

impl RuleFindings {
    /// Run every rule against the extracted content.
    pub fn evaluate(request: &VerificationRequest, content: &ExtractedContent) -> Self {
        let missing = missing_keywords(&content.text, &request.keywords);

        Self {
            keyword_test: missing.is_empty(),
            missing_keywords: missing,
            word_count_test: word_count_test(content.char_count, request.min_char_count),
            image_count_test: image_count_test(content.image_count, request.min_image_count),
        }
    }
}
