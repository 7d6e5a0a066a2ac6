//! Application configuration loaded from YAML.
//!
//! ```yaml
//! server:
//!   bind_address: 0.0.0.0
//!   port: 8000
//! llm:
//!   model: gpt-4
//!   timeout: 60s
//! report:
//!   output_dir: ./results
//!   font_path: fonts/NanumGothic-Regular.ttf
//! ```
//!
//! Everything except `server` is the runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use sponsorcheck_runtime::{ConfigError, RuntimeConfig};

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Full bind address (address:port).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.runtime.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from a file if one is given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
