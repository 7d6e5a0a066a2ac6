//! Condition verdicts and parsing of the judge model's answer.
//!
//! The model is asked for one `condition → Yes|No` line per condition, but
//! nothing guarantees it complies. Parsing is therefore permissive per line
//! and strict per token:
//!
//! - A JSON array of `{"condition", "result"}` objects (optionally inside a
//!   markdown code fence) is accepted first.
//! - Otherwise each line containing [`VERDICT_SEPARATOR`] is split on its
//!   first occurrence. The left side loses any label prefix (`조건:`, `- `,
//!   `1.`); the right side must be `yes` or `no` in any casing.
//! - Lines that do not qualify are logged and dropped, never fatal.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Separator between condition text and result in a verdict line.
pub const VERDICT_SEPARATOR: &str = "→";

lazy_static! {
    /// Bullets, list numbers and "조건:"/"condition:" labels in front of a condition.
    /// A list number needs trailing whitespace or a label so "2.5kg" stays intact.
    static ref LABEL_PREFIX: Regex = Regex::new(
        r"(?i)^\s*(?:[-*•·]\s*|\d+[.)]\s+)*(?:(?:\d+[.)]\s*)?(?:조건|condition)\s*\d*\s*[:：]\s*)?"
    ).unwrap();
}

/// One condition's outcome as reported by the judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionVerdict {
    /// Condition text as echoed by the model
    #[serde(rename = "condition")]
    pub condition_text: String,

    /// The model's literal answer ("Yes", "no", "YES", ...)
    pub result: String,
}

impl ConditionVerdict {
    pub fn new(condition_text: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            condition_text: condition_text.into(),
            result: result.into(),
        }
    }

    /// Whether the verdict is a (case-insensitive) "yes".
    pub fn passed(&self) -> bool {
        self.result.eq_ignore_ascii_case("yes")
    }
}

/// Aggregate outcome of one judge call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JudgeOutcome {
    /// True iff every detail passed. Vacuously true when `details` is empty.
    pub all_passed: bool,

    /// Verdicts in the order the model reported them
    pub details: Vec<ConditionVerdict>,
}

impl JudgeOutcome {
    pub fn from_details(details: Vec<ConditionVerdict>) -> Self {
        Self {
            all_passed: details.iter().all(ConditionVerdict::passed),
            details,
        }
    }

    /// Outcome for a request without conditions.
    pub fn vacuous() -> Self {
        Self::from_details(Vec::new())
    }

    /// True when the outcome passes only because nothing was judged.
    pub fn is_vacuous(&self) -> bool {
        self.details.is_empty()
    }
}

/// Parse a complete model response into an outcome.
pub fn parse_judge_response(response: &str) -> JudgeOutcome {
    let details = match parse_json_verdicts(response) {
        Some(details) => {
            debug!(count = details.len(), "Parsed judge response as JSON");
            details
        }
        None => parse_line_verdicts(response),
    };

    JudgeOutcome::from_details(details)
}

/// Parse the `condition → Yes|No` line format, dropping unparseable lines.
pub fn parse_line_verdicts(response: &str) -> Vec<ConditionVerdict> {
    response
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let verdict = parse_verdict_line(line);
            if verdict.is_none() {
                warn!(line = %line, "Dropping unparseable judge line");
            }
            verdict
        })
        .collect()
}

/// Parse a single verdict line.
pub fn parse_verdict_line(line: &str) -> Option<ConditionVerdict> {
    let (condition, result) = line.split_once(VERDICT_SEPARATOR)?;

    let condition = clean_condition(condition);
    let result = result.trim();

    if condition.is_empty() || !is_verdict_token(result) {
        return None;
    }

    Some(ConditionVerdict::new(condition, result))
}

/// Parse a JSON array of verdict objects, if the response is one.
///
/// Returns `None` when the response is not a JSON array, so the caller can
/// fall back to the line format. Entries with a result other than yes/no
/// are dropped.
pub fn parse_json_verdicts(response: &str) -> Option<Vec<ConditionVerdict>> {
    let json = strip_code_fence(response);
    if !json.starts_with('[') {
        return None;
    }

    let entries: Vec<serde_json::Value> = serde_json::from_str(json).ok()?;

    let verdicts = entries
        .iter()
        .filter_map(|entry| {
            let condition = entry.get("condition").and_then(|v| v.as_str());
            let result = entry.get("result").and_then(|v| v.as_str());

            match (condition, result) {
                (Some(condition), Some(result)) if is_verdict_token(result.trim()) => {
                    let condition = clean_condition(condition);
                    if condition.is_empty() {
                        warn!(entry = %entry, "Dropping judge entry without condition text");
                        return None;
                    }
                    Some(ConditionVerdict::new(condition, result.trim()))
                }
                _ => {
                    warn!(entry = %entry, "Dropping malformed judge entry");
                    None
                }
            }
        })
        .collect();

    Some(verdicts)
}

fn is_verdict_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("yes") || token.eq_ignore_ascii_case("no")
}

fn clean_condition(raw: &str) -> String {
    let stripped = LABEL_PREFIX.replace(raw, "");
    let stripped = stripped.trim();

    // The prompt's example wraps the condition in brackets; models copy that.
    let stripped = stripped
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(stripped);

    stripped.trim().to_string()
}

/// Models sometimes wrap JSON in a markdown code block.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_response() {
        let response = "정직한 리뷰 작성 → Yes\n가격 명시 → No\ngarbage line without separator";
        let outcome = parse_judge_response(response);

        assert_eq!(outcome.details.len(), 2);
        assert!(!outcome.all_passed);
        assert_eq!(outcome.details[0], ConditionVerdict::new("정직한 리뷰 작성", "Yes"));
        assert_eq!(outcome.details[1], ConditionVerdict::new("가격 명시", "No"));
    }

    #[test]
    fn test_result_casing_is_preserved() {
        let outcome = parse_judge_response("조건 → YES");

        assert_eq!(outcome.details.len(), 1);
        assert_eq!(outcome.details[0].result, "YES");
        assert!(outcome.all_passed);
    }

    #[test]
    fn test_label_prefix_is_stripped() {
        let verdict = parse_verdict_line("조건: 원고료를 지급받았음을 명시 → Yes").unwrap();
        assert_eq!(verdict.condition_text, "원고료를 지급받았음을 명시");

        let verdict = parse_verdict_line("- 조건: [가격 명시] → no").unwrap();
        assert_eq!(verdict.condition_text, "가격 명시");
        assert_eq!(verdict.result, "no");

        let verdict = parse_verdict_line("2. Condition: mention the price → Yes").unwrap();
        assert_eq!(verdict.condition_text, "mention the price");
    }

    #[test]
    fn test_leading_digits_of_condition_are_kept() {
        let verdict = parse_verdict_line("2.5kg 이상 언급 → Yes").unwrap();
        assert_eq!(verdict.condition_text, "2.5kg 이상 언급");

        let verdict = parse_verdict_line("3) 10% 할인 문구 → No").unwrap();
        assert_eq!(verdict.condition_text, "10% 할인 문구");

        let verdict = parse_verdict_line("1.조건: 2.5kg 이상 언급 → Yes").unwrap();
        assert_eq!(verdict.condition_text, "2.5kg 이상 언급");
    }

    #[test]
    fn test_split_on_first_separator() {
        let line = "A → B 순서로 설명 → Yes";
        assert!(parse_verdict_line(line).is_none());

        let verdict = parse_verdict_line("순서 설명 → Yes").unwrap();
        assert_eq!(verdict.result, "Yes");
    }

    #[test]
    fn test_non_verdict_result_is_dropped() {
        assert!(parse_verdict_line("가격 명시 → 아마도").is_none());
        assert!(parse_verdict_line("가격 명시 → Yes, mostly").is_none());
        assert!(parse_verdict_line(" → Yes").is_none());
    }

    #[test]
    fn test_empty_response_is_vacuous_pass() {
        let outcome = parse_judge_response("");
        assert!(outcome.all_passed);
        assert!(outcome.details.is_empty());
        assert!(outcome.is_vacuous());
    }

    #[test]
    fn test_parse_json_response() {
        let response = r#"```json
[
  {"condition": "정직한 리뷰 작성", "result": "Yes"},
  {"condition": "가격 명시", "result": "maybe"},
  {"condition": "해시태그 포함", "result": "no"}
]
```"#;
        let outcome = parse_judge_response(response);

        assert_eq!(outcome.details.len(), 2);
        assert_eq!(outcome.details[1], ConditionVerdict::new("해시태그 포함", "no"));
        assert!(!outcome.all_passed);
    }

    #[test]
    fn test_invalid_json_falls_back_to_lines() {
        let response = "[not json\n정직한 리뷰 작성 → Yes";
        let outcome = parse_judge_response(response);
        assert_eq!(outcome.details.len(), 1);
        assert!(outcome.all_passed);
    }

    #[test]
    fn test_verdict_serializes_with_wire_names() {
        let value = serde_json::to_value(ConditionVerdict::new("가격 명시", "No")).unwrap();
        assert_eq!(value["condition"], "가격 명시");
        assert_eq!(value["result"], "No");
    }
}
