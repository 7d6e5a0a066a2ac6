//! Post content extraction.
//!
//! An extractor turns a post URL into [`ExtractedContent`]. The HTTP
//! implementation lives behind the `http-extractor` feature; tests and
//! embedders can supply their own [`ContentExtractor`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use sponsorcheck_core::ExtractedContent;

mod strategy;

#[cfg(feature = "http-extractor")]
mod http;

pub use strategy::{
    default_strategies, extract_post, find_content_frame, ContentStrategy, LegacyViewerStrategy,
    SmartEditorStrategy,
};

#[cfg(feature = "http-extractor")]
pub use http::BlogExtractor;

/// Errors from fetching or reading a post.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not open HTTP session: {0}")]
    Session(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("No post content found at {url} (tried: {tried})")]
    ContentNotFound { url: String, tried: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Extracts a post's text and image count from its URL.
///
/// Each call owns whatever session it opens and releases it before
/// returning, on success and on failure alike.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, CrawlError>;

    fn name(&self) -> &str;
}
