//! Prompts for the condition judge.
//!
//! The system prompt is fixed. The user prompt lists the conditions, states
//! the answer format, then appends the post body after a `블로그 본문:` marker.

use crate::config::ResponseFormat;
use crate::providers::ChatMessage;

/// System prompt for the judge.
pub const JUDGE_SYSTEM_PROMPT: &str = "당신은 계약 이행 분석 전문가입니다.";

const LINE_FORMAT_INSTRUCTIONS: &str = r#"아래 블로그 본문에서 각 조건이 충족되었는지 판단해 주세요.
각 조건당 "Yes" 또는 "No"만 반환해 주세요. 다음 예시처럼:

조건: [조건 내용] → Yes 또는 No"#;

const JSON_FORMAT_INSTRUCTIONS: &str = r#"아래 블로그 본문에서 각 조건이 충족되었는지 판단해 주세요.
다른 설명 없이 다음 JSON 배열 형식으로만 답해 주세요. result는 "Yes" 또는 "No"입니다:

[{"condition": "[조건 내용]", "result": "Yes"}]"#;

const CONTENT_MARKER: &str = "블로그 본문:";

/// Builds the judge's messages for one post.
#[derive(Debug, Clone)]
pub struct JudgePrompt<'a> {
    conditions: &'a [String],
    content: &'a str,
    format: ResponseFormat,
}

impl<'a> JudgePrompt<'a> {
    pub fn new(conditions: &'a [String], content: &'a str) -> Self {
        Self {
            conditions,
            content,
            format: ResponseFormat::Lines,
        }
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// The user prompt text.
    pub fn user_prompt(&self) -> String {
        let listed = self
            .conditions
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n");

        let instructions = match self.format {
            ResponseFormat::Lines => LINE_FORMAT_INSTRUCTIONS,
            ResponseFormat::Json => JSON_FORMAT_INSTRUCTIONS,
        };

        format!(
            "다음은 계약 조건입니다:\n{}\n\n{}\n\n{}\n{}",
            listed, instructions, CONTENT_MARKER, self.content
        )
    }

    /// System and user messages, in that order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(JUDGE_SYSTEM_PROMPT),
            ChatMessage::user(self.user_prompt()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions() -> Vec<String> {
        vec!["정직한 리뷰 작성".to_string(), "가격 명시".to_string()]
    }

    #[test]
    fn test_conditions_listed_as_bullets() {
        let conditions = conditions();
        let prompt = JudgePrompt::new(&conditions, "본문").user_prompt();

        assert!(prompt.starts_with("다음은 계약 조건입니다:\n- 정직한 리뷰 작성\n- 가격 명시\n"));
        assert!(prompt.contains("조건: [조건 내용] → Yes 또는 No"));
    }

    #[test]
    fn test_content_follows_marker() {
        let conditions = conditions();
        let prompt = JudgePrompt::new(&conditions, "오늘 다녀온 카페 후기").user_prompt();

        assert!(prompt.ends_with("블로그 본문:\n오늘 다녀온 카페 후기"));
    }

    #[test]
    fn test_json_format_instructions() {
        let conditions = conditions();
        let prompt = JudgePrompt::new(&conditions, "본문")
            .with_format(ResponseFormat::Json)
            .user_prompt();

        assert!(prompt.contains(r#"[{"condition": "[조건 내용]", "result": "Yes"}]"#));
        assert!(!prompt.contains("→"));
    }

    #[test]
    fn test_messages_order() {
        let conditions = conditions();
        let messages = JudgePrompt::new(&conditions, "본문").messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(JUDGE_SYSTEM_PROMPT));
        assert_eq!(messages[1].role, "user");
    }
}
