//! # sponsorcheck-cli
//!
//! HTTP service and command-line front end for sponsored-post verification.

pub mod config;
pub mod server;

pub use config::{AppConfig, ServerConfig};
pub use server::{create_router, serve, AnalyzeResponse, ApiError, AppState};
