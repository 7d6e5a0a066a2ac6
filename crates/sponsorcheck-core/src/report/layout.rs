//! Report layout: turns a compliance report into an ordered list of blocks.

use serde::{Deserialize, Serialize};

use super::labels::ReportLabels;
use crate::synthesizer::ComplianceReport;

/// Request metadata printed in the title block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetadata {
    pub contract_title: String,
    pub influencer_name: String,
    pub site_url: String,
}

/// The summary table: a header row plus one row per check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub header: [String; 2],
    pub rows: Vec<[String; 2]>,
}

impl SummaryTable {
    /// Header and body rows, in display order.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String; 2]> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

/// One layout element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Document title with its label
    Title { label: String, value: String },
    /// Labeled value in body text
    Field { label: String, value: String },
    Table(SummaryTable),
    Heading { level: u8, text: String },
    Paragraph(String),
    /// Vertical space in points
    Spacer(f32),
}

/// A fully laid-out report, ready for any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    /// Lay out a report.
    pub fn build(
        metadata: &ReportMetadata,
        report: &ComplianceReport,
        labels: &ReportLabels,
    ) -> Self {
        let mut blocks = vec![
            Block::Title {
                label: labels.contract_title.to_string(),
                value: metadata.contract_title.clone(),
            },
            Block::Spacer(12.0),
            Block::Field {
                label: labels.influencer_name.to_string(),
                value: metadata.influencer_name.clone(),
            },
            Block::Spacer(12.0),
            Block::Field {
                label: labels.site_url.to_string(),
                value: metadata.site_url.clone(),
            },
            Block::Spacer(24.0),
            Block::Table(summary_table(report, labels)),
            Block::Spacer(24.0),
        ];

        if !report.keyword_test && !report.missing_keywords.is_empty() {
            blocks.extend([
                Block::Spacer(12.0),
                Block::Heading {
                    level: 3,
                    text: labels.missing_keywords.to_string(),
                },
                Block::Spacer(6.0),
                Block::Paragraph(report.missing_keywords.join(", ")),
                Block::Spacer(12.0),
            ]);
        }

        blocks.push(Block::Heading {
            level: 2,
            text: labels.condition_details.to_string(),
        });
        blocks.push(Block::Spacer(12.0));

        for (index, verdict) in report.condition_details.iter().enumerate() {
            blocks.push(Block::Paragraph(format!(
                "{}. {} {} → {} ({})",
                index + 1,
                labels.condition_prefix,
                verdict.condition_text,
                labels.symbol(verdict.passed()),
                verdict.result
            )));
            blocks.push(Block::Spacer(6.0));
        }

        Self {
            title: metadata.contract_title.clone(),
            blocks,
        }
    }

    pub fn summary_table(&self) -> Option<&SummaryTable> {
        self.blocks.iter().find_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Whether a heading with this text exists.
    pub fn has_heading(&self, text: &str) -> bool {
        self.blocks
            .iter()
            .any(|block| matches!(block, Block::Heading { text: t, .. } if t == text))
    }

    /// All paragraph texts, in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

fn summary_table(report: &ComplianceReport, labels: &ReportLabels) -> SummaryTable {
    let row = |label: &str, passed: bool| [label.to_string(), labels.mark(passed).to_string()];

    SummaryTable {
        header: [labels.check_item.to_string(), labels.passed.to_string()],
        rows: vec![
            row(labels.keyword_row, report.keyword_test),
            row(labels.condition_row, report.condition_test),
            row(labels.word_count_row, report.word_count_test),
            row(labels.image_count_row, report.image_count_test),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleFindings;
    use crate::synthesizer::Synthesizer;
    use crate::verdict::{ConditionVerdict, JudgeOutcome};

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            contract_title: "봄 시즌 협찬".to_string(),
            influencer_name: "홍길동".to_string(),
            site_url: "https://blog.naver.com/example/223".to_string(),
        }
    }

    fn report(missing: &[&str], details: Vec<ConditionVerdict>) -> ComplianceReport {
        let rules = RuleFindings {
            keyword_test: missing.is_empty(),
            missing_keywords: missing.iter().map(|s| s.to_string()).collect(),
            word_count_test: true,
            image_count_test: false,
        };
        Synthesizer::new().synthesize(rules, JudgeOutcome::from_details(details))
    }

    #[test]
    fn test_summary_table_has_five_rows() {
        let doc = ReportDocument::build(&metadata(), &report(&[], vec![]), &ReportLabels::english());
        let table = doc.summary_table().unwrap();

        let rows: Vec<_> = table.all_rows().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], &["Check Item".to_string(), "Passed".to_string()]);
        assert_eq!(rows[3][1], "O");
        assert_eq!(rows[4][1], "X");
    }

    #[test]
    fn test_title_block_order() {
        let doc = ReportDocument::build(&metadata(), &report(&[], vec![]), &ReportLabels::korean());

        assert_eq!(doc.title, "봄 시즌 협찬");
        assert!(matches!(&doc.blocks[0], Block::Title { label, value } if label == "광고 이름" && value == "봄 시즌 협찬"));
        assert!(matches!(&doc.blocks[2], Block::Field { value, .. } if value == "홍길동"));
        assert!(matches!(&doc.blocks[4], Block::Field { label, .. } if label == "URL"));
    }

    #[test]
    fn test_missing_keywords_section_when_keyword_test_fails() {
        let labels = ReportLabels::korean();
        let doc = ReportDocument::build(&metadata(), &report(&["할인", "이벤트"], vec![]), &labels);

        assert!(doc.has_heading(labels.missing_keywords));
        assert!(doc.paragraphs().any(|p| p == "할인, 이벤트"));
    }

    #[test]
    fn test_no_missing_keywords_section_when_keyword_test_passes() {
        let labels = ReportLabels::korean();
        let doc = ReportDocument::build(&metadata(), &report(&[], vec![]), &labels);

        assert!(!doc.has_heading(labels.missing_keywords));
        assert!(doc.has_heading(labels.condition_details));
    }

    #[test]
    fn test_condition_lines_are_numbered_in_order() {
        let details = vec![
            ConditionVerdict::new("정직한 리뷰 작성", "Yes"),
            ConditionVerdict::new("가격 명시", "No"),
        ];
        let doc = ReportDocument::build(&metadata(), &report(&[], details), &ReportLabels::english());
        let lines: Vec<&str> = doc.paragraphs().collect();

        assert_eq!(
            lines,
            vec![
                "1. condition: 정직한 리뷰 작성 → ✅ (Yes)",
                "2. condition: 가격 명시 → ❌ (No)",
            ]
        );
    }
}
