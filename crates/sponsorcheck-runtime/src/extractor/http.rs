//! HTTP extractor for Naver-style blog posts.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, trace};

use sponsorcheck_core::ExtractedContent;

use super::strategy::{default_strategies, extract_post, find_content_frame, ContentStrategy};
use super::{ContentExtractor, CrawlError};
use crate::config::ExtractorConfig;

/// Fetches a post page, follows its `mainFrame` iframe, and reads the post
/// container with the configured strategies.
pub struct BlogExtractor {
    config: ExtractorConfig,
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl BlogExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            strategies: default_strategies(),
        }
    }

    fn strategy_names(&self) -> String {
        self.strategies
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl ContentExtractor for BlogExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, CrawlError> {
        let page_url = Url::parse(url).map_err(|e| CrawlError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let session = Session::open(&self.config)?;
        let page = session.fetch(&page_url).await?;

        let frame_src = if self.config.follow_frames {
            find_content_frame(&page)
        } else {
            None
        };

        let (document, document_url) = match frame_src {
            Some(src) => {
                let frame_url = page_url.join(&src).map_err(|e| CrawlError::InvalidUrl {
                    url: src.clone(),
                    reason: e.to_string(),
                })?;
                debug!(frame = %frame_url, "following content frame");
                (session.fetch(&frame_url).await?, frame_url)
            }
            None => (page, page_url),
        };
        drop(session);

        let (content, strategy) =
            extract_post(&document, &self.strategies).ok_or_else(|| CrawlError::ContentNotFound {
                url: document_url.to_string(),
                tried: self.strategy_names(),
            })?;

        debug!(
            strategy,
            chars = content.char_count,
            images = content.image_count,
            "post content extracted"
        );
        Ok(content)
    }

    fn name(&self) -> &str {
        "blog-http"
    }
}

/// A request-scoped HTTP session: its own client, cookies and connections.
struct Session {
    client: reqwest::Client,
}

impl Session {
    fn open(config: &ExtractorConfig) -> Result<Self, CrawlError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| CrawlError::Session(e.to_string()))?;
        trace!("extraction session opened");
        Ok(Self { client })
    }

    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| fetch_error(url, e))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        trace!("extraction session closed");
    }
}

fn fetch_error(url: &Url, error: reqwest::Error) -> CrawlError {
    CrawlError::Fetch {
        url: url.to_string(),
        reason: error.to_string(),
    }
}
