//! Runtime configuration.
//!
//! Every section has defaults, so an empty document is a valid config.
//! Durations are written as human-readable strings (`"30s"`, `"2m"`).

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use sponsorcheck_core::ReportLocale;

use crate::providers::CompletionConfig;

/// Errors from loading or checking configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All runtime settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub llm: LlmConfig,
    pub judge: JudgeConfig,
    pub extractor: ExtractorConfig,
    pub report: ReportConfig,
}

impl RuntimeConfig {
    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "llm.model",
                reason: "must not be empty".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid {
                field: "llm.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        for (field, timeout) in [
            ("llm.timeout", self.llm.timeout),
            ("extractor.timeout", self.extractor.timeout),
            ("report.timeout", self.report.timeout),
        ] {
            if timeout.is_zero() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if self.report.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "report.output_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Registry name of the provider
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// Falls back to the provider's environment variable when unset
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(with = "duration_str")]
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            base_url: None,
            api_key: None,
            max_tokens: 1000,
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }
}

impl LlmConfig {
    /// Settings handed to the provider factory.
    pub fn provider_settings(&self) -> serde_json::Value {
        let mut settings = serde_json::json!({});
        if let Some(key) = &self.api_key {
            settings["api_key"] = serde_json::Value::from(key.expose_secret());
        }
        if let Some(url) = &self.base_url {
            settings["base_url"] = serde_json::Value::String(url.clone());
        }
        settings
    }

    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

/// Shape the judge asks the model to answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `조건: ... → Yes` lines
    #[default]
    Lines,
    /// `[{"condition": ..., "result": ...}]`
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    pub response_format: ResponseFormat,
    /// Treat zero parsed verdicts for a non-empty condition list as an error
    pub reject_empty_verdicts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    #[serde(with = "duration_str")]
    pub timeout: Duration,
    pub user_agent: String,
    /// Follow the `mainFrame` iframe when the page has one
    pub follow_frames: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("sponsorcheck/", env!("CARGO_PKG_VERSION")).to_string(),
            follow_frames: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    /// TrueType font with Hangul glyphs, loaded once at startup
    pub font_path: PathBuf,
    pub locale: ReportLocale,
    #[serde(with = "duration_str")]
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./results"),
            format: ReportFormat::Pdf,
            font_path: PathBuf::from("NanumGothic-Regular.ttf"),
            locale: ReportLocale::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
