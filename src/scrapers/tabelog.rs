use crate::config::Config;
use crate::error::TransportError;
use crate::models::Restaurant;
use crate::scrapers::params::{build_params, QueryParams};
use crate::scrapers::parser::parse_restaurants;
use crate::scrapers::traits::{BlockingPageFetcher, FetchedPage, PageFetcher};
use crate::scrapers::types::SearchRequest;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_REDIRECTS: usize = 10;

/// Async Tabelog search client
pub struct TabelogClient {
    client: Client,
    search_url: String,
    // ceiling for per-request timeouts
    timeout: Duration,
}

impl TabelogClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&Config::default())
    }

    /// Create a client for the endpoint and user agent in `config`.
    /// `config.timeout` caps every per-request timeout.
    pub fn with_config(config: &Config) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            timeout: config.timeout,
        })
    }

    /// Fetch and parse a single results page, without pagination or metadata
    pub async fn search_page(&self, request: &SearchRequest) -> Result<Vec<Restaurant>, TransportError> {
        info!("Fetching page {} from {}", request.page(), self.search_url);

        let page = self.fetch(&build_params(request), request.timeout()).await?;
        if !page.is_success() {
            warn!("Tabelog returned status: {}", page.status);
            return Err(TransportError::Status {
                status: page.status,
                url: self.search_url.clone(),
            });
        }

        Ok(parse_restaurants(&page.body))
    }
}

#[async_trait]
impl PageFetcher for TabelogClient {
    async fn fetch(&self, params: &QueryParams, timeout: Duration) -> Result<FetchedPage, TransportError> {
        debug!("GET {} {:?}", self.search_url, params);

        let response = self
            .client
            .get(&self.search_url)
            .query(params)
            .timeout(timeout.min(self.timeout))
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::Request)?;
        debug!("Downloaded {} bytes of HTML (status {})", body.len(), status);

        Ok(FetchedPage { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.search_url
    }
}

/// Blocking Tabelog search client.
/// Must not be used from inside an async runtime.
pub struct BlockingTabelogClient {
    client: reqwest::blocking::Client,
    search_url: String,
    timeout: Duration,
}

impl BlockingTabelogClient {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            timeout: config.timeout,
        })
    }
}

impl BlockingPageFetcher for BlockingTabelogClient {
    fn fetch_blocking(&self, params: &QueryParams, timeout: Duration) -> Result<FetchedPage, TransportError> {
        debug!("GET {} {:?}", self.search_url, params);

        let response = self
            .client
            .get(&self.search_url)
            .query(params)
            .timeout(timeout.min(self.timeout))
            .send()
            .map_err(TransportError::Request)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(TransportError::Request)?;
        debug!("Downloaded {} bytes of HTML (status {})", body.len(), status);

        Ok(FetchedPage { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.search_url
    }
}
