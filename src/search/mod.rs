//! Multi-page search orchestration.
//!
//! Pages are fetched one after another: how many pages exist is only
//! known once page 1 has been parsed. Both the async and the blocking
//! entry points drive the same page walk, so they stop, clamp and
//! classify identically.

pub mod cache;

use crate::error::TransportError;
use crate::models::{Restaurant, SearchMeta, SearchResponse};
use crate::scrapers::meta::meta_in;
use crate::scrapers::params::{build_params, QueryParams};
use crate::scrapers::parser::restaurants_in;
use crate::scrapers::traits::{BlockingPageFetcher, FetchedPage, PageFetcher};
use crate::scrapers::types::SearchRequest;
use cache::{CacheKey, ResponseCache};
use scraper::Html;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub type SharedCache = Arc<Mutex<ResponseCache>>;

/// Drives one orchestrated search per call over a page fetcher
pub struct SearchOrchestrator<F> {
    fetcher: F,
    cache: Option<SharedCache>,
}

impl<F> SearchOrchestrator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: None,
        }
    }

    /// Serve repeated searches from `cache` and store completed ones there
    pub fn with_cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn cached(&self, key: &CacheKey) -> Option<SearchResponse> {
        let cache = self.cache.as_ref()?;
        let hit = cache.lock().ok()?.get(key);
        if hit.is_some() {
            debug!("Cache hit for {}", key);
        }
        hit
    }

    fn store(&self, key: CacheKey, response: &SearchResponse) {
        if response.is_error() {
            return;
        }
        if let Some(cache) = &self.cache {
            match cache.lock() {
                Ok(mut cache) => cache.insert(key, response.clone()),
                Err(_) => warn!("Search cache lock poisoned, not caching"),
            }
        }
    }
}

impl<F: PageFetcher> SearchOrchestrator<F> {
    /// Run the search, suspending at each page fetch
    pub async fn execute(&self, request: &SearchRequest) -> SearchResponse {
        let key = CacheKey::for_request(request);
        if let Some(response) = self.cached(&key) {
            return response;
        }

        log_start(request);
        let mut walk = PageWalk::new(request);
        while let Some((page, params)) = walk.next_page() {
            info!("Fetching page {} from {}", page, self.fetcher.endpoint());
            let fetched = self.fetcher.fetch(&params, request.timeout()).await;
            if let Err(message) = walk.absorb(page, fetched, self.fetcher.endpoint()) {
                return SearchResponse::error(message);
            }
        }

        let response = walk.finish();
        self.store(key, &response);
        response
    }
}

impl<F: BlockingPageFetcher> SearchOrchestrator<F> {
    /// Run the search on the calling thread
    pub fn execute_blocking(&self, request: &SearchRequest) -> SearchResponse {
        let key = CacheKey::for_request(request);
        if let Some(response) = self.cached(&key) {
            return response;
        }

        log_start(request);
        let mut walk = PageWalk::new(request);
        while let Some((page, params)) = walk.next_page() {
            info!("Fetching page {} from {}", page, self.fetcher.endpoint());
            let fetched = self.fetcher.fetch_blocking(&params, request.timeout());
            if let Err(message) = walk.absorb(page, fetched, self.fetcher.endpoint()) {
                return SearchResponse::error(message);
            }
        }

        let response = walk.finish();
        self.store(key, &response);
        response
    }
}

fn log_start(request: &SearchRequest) {
    info!(
        "Searching Tabelog: area={:?} keyword={:?} sort={} max_pages={}",
        request.area(),
        request.keyword(),
        request.sort_type(),
        request.max_pages()
    );
}

/// Pagination state of one orchestrated search
struct PageWalk<'r> {
    request: &'r SearchRequest,
    next: u32,
    // local bound; clamping never touches the caller's request
    last: u32,
    done: bool,
    restaurants: Vec<Restaurant>,
    meta: Option<SearchMeta>,
}

impl<'r> PageWalk<'r> {
    fn new(request: &'r SearchRequest) -> Self {
        Self {
            request,
            next: 1,
            last: request.max_pages(),
            done: false,
            restaurants: Vec::new(),
            meta: None,
        }
    }

    fn next_page(&self) -> Option<(u32, QueryParams)> {
        if self.done || self.next > self.last {
            return None;
        }
        let page = self.next;
        Some((page, build_params(&self.request.with_page(page))))
    }

    /// Fold one fetched page into the walk. `Err` carries the message of
    /// a failed fetch, which ends the search without partial results.
    fn absorb(
        &mut self,
        page: u32,
        fetched: Result<FetchedPage, TransportError>,
        endpoint: &str,
    ) -> Result<(), String> {
        let fetched = fetched.map_err(|e| {
            warn!("Fetching page {} failed: {}", page, e);
            e.to_string()
        })?;

        if !fetched.is_success() {
            warn!("Tabelog returned status: {}", fetched.status);
            return Err(TransportError::Status {
                status: fetched.status,
                url: endpoint.to_string(),
            }
            .to_string());
        }

        let document = Html::parse_document(&fetched.body);
        let found = restaurants_in(&document);
        let page_empty = found.is_empty();
        info!("Page {} yielded {} restaurants", page, found.len());
        self.restaurants.extend(found);

        if page == 1 && self.request.include_meta() {
            let meta = meta_in(&document, page);
            if meta.total_count == 0 {
                debug!("Total count is 0, stopping");
                self.done = true;
            } else if self.last > meta.total_pages {
                debug!("Clamping page limit {} to {}", self.last, meta.total_pages);
                self.last = meta.total_pages;
            }
            self.meta = Some(meta);
        }

        if page_empty {
            debug!("Page {} was empty, stopping", page);
            self.done = true;
        }

        self.next = page + 1;
        Ok(())
    }

    fn finish(self) -> SearchResponse {
        info!("Search finished with {} restaurants", self.restaurants.len());
        SearchResponse::completed(self.restaurants, self.meta)
    }
}
