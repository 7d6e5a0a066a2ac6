//! Verification request parsing from JSON/YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_request_schema;

/// Errors that can occur when accepting a verification request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to read request file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Request does not match schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

/// A request to verify one sponsored post against its contract.
///
/// Field names on the wire follow the public API (`media_text`,
/// `media_image` for the two volume thresholds).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Title of the advertising contract
    pub contract_title: String,

    /// Influencer who published the post
    pub influencer_name: String,

    /// URL of the post to verify
    pub site_url: String,

    /// Representative image URL. Part of the contract, not used by the checks.
    pub image_url: String,

    /// Keywords that must all appear in the post (case-insensitive)
    pub keywords: Vec<String>,

    /// Free-form conditions judged semantically
    pub conditions: Vec<String>,

    /// Minimum number of characters in the post body
    #[serde(rename = "media_text")]
    pub min_char_count: usize,

    /// Minimum number of images in the post body
    #[serde(rename = "media_image")]
    pub min_image_count: usize,
}

impl VerificationRequest {
    /// Accept a request from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        validate_request_schema(&value).map_err(RequestError::SchemaViolation)?;
        let request: VerificationRequest = serde_json::from_value(value)?;
        request.validate()?;
        Ok(request)
    }

    /// Parse a request from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a request from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RequestError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a request file, choosing the format by extension
    /// (`.yaml`/`.yml` is YAML, anything else JSON).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// Semantic checks the schema cannot express.
    fn validate(&self) -> Result<(), RequestError> {
        if self.contract_title.trim().is_empty() {
            return Err(invalid("contract_title", "must not be blank"));
        }

        if self.influencer_name.trim().is_empty() {
            return Err(invalid("influencer_name", "must not be blank"));
        }

        let url = self.site_url.trim();
        let host = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or_default();
        if host.is_empty() || host.starts_with('/') {
            return Err(invalid("site_url", "must be an absolute http(s) URL"));
        }

        if let Some(position) = self.keywords.iter().position(|k| k.trim().is_empty()) {
            return Err(invalid(
                &format!("keywords[{}]", position),
                "must not be blank",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> RequestError {
    RequestError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
