//! Label sets for the rendered report.

use serde::{Deserialize, Serialize};

/// Language of the report's fixed labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportLocale {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

/// Every fixed string that appears in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub contract_title: &'static str,
    pub influencer_name: &'static str,
    pub site_url: &'static str,
    pub check_item: &'static str,
    pub passed: &'static str,
    pub keyword_row: &'static str,
    pub condition_row: &'static str,
    pub word_count_row: &'static str,
    pub image_count_row: &'static str,
    pub missing_keywords: &'static str,
    pub condition_details: &'static str,
    pub condition_prefix: &'static str,
    /// Summary table glyphs
    pub pass_mark: &'static str,
    pub fail_mark: &'static str,
    /// Condition detail glyphs
    pub pass_symbol: &'static str,
    pub fail_symbol: &'static str,
}

impl ReportLabels {
    pub fn korean() -> Self {
        Self {
            contract_title: "광고 이름",
            influencer_name: "인플루언서 이름",
            site_url: "URL",
            check_item: "검사 항목",
            passed: "충족 여부",
            keyword_row: "키워드 포함",
            condition_row: "세부 조건",
            word_count_row: "글자 수",
            image_count_row: "이미지 수",
            missing_keywords: "누락된 키워드",
            condition_details: "조건 상세 분석",
            condition_prefix: "조건:",
            pass_mark: "O",
            fail_mark: "X",
            pass_symbol: "✅",
            fail_symbol: "❌",
        }
    }

    pub fn english() -> Self {
        Self {
            contract_title: "Contract",
            influencer_name: "Influencer",
            site_url: "URL",
            check_item: "Check Item",
            passed: "Passed",
            keyword_row: "Keywords",
            condition_row: "Conditions",
            word_count_row: "Character Count",
            image_count_row: "Image Count",
            missing_keywords: "Missing Keywords",
            condition_details: "Condition Details",
            condition_prefix: "condition:",
            pass_mark: "O",
            fail_mark: "X",
            pass_symbol: "✅",
            fail_symbol: "❌",
        }
    }

    pub fn for_locale(locale: ReportLocale) -> Self {
        match locale {
            ReportLocale::Korean => Self::korean(),
            ReportLocale::English => Self::english(),
        }
    }

    pub fn mark(&self, passed: bool) -> &'static str {
        if passed {
            self.pass_mark
        } else {
            self.fail_mark
        }
    }

    pub fn symbol(&self, passed: bool) -> &'static str {
        if passed {
            self.pass_symbol
        } else {
            self.fail_symbol
        }
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::korean()
    }
}
