use crate::error::TransportError;
use crate::scrapers::params::QueryParams;
use async_trait::async_trait;
use std::time::Duration;

/// Raw response of one search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET one search page, following redirects.
/// Implementations report connection and timeout failures as errors and
/// hand back every HTTP status, successful or not.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, params: &QueryParams, timeout: Duration) -> Result<FetchedPage, TransportError>;

    /// Endpoint used in log lines and error messages
    fn endpoint(&self) -> &str;
}

/// Blocking twin of [`PageFetcher`]
pub trait BlockingPageFetcher {
    fn fetch_blocking(&self, params: &QueryParams, timeout: Duration) -> Result<FetchedPage, TransportError>;

    fn endpoint(&self) -> &str;
}
