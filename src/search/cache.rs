use crate::models::SearchResponse;
use crate::scrapers::params::build_params;
use crate::scrapers::types::SearchRequest;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Identity of an orchestrated search: page-1 parameters plus pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &SearchRequest) -> Self {
        // JSON quoting keeps values containing '&' or '=' apart from real keys
        let key = json!({
            "params": build_params(&request.with_page(1)),
            "max_pages": request.max_pages(),
            "include_meta": request.include_meta(),
        });

        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded least-recently-used store of search responses.
///
/// Nothing is shared unless the caller hands the same cache to several
/// orchestrators. Eviction beyond the capacity bound is up to the caller
/// through [`ResponseCache::remove`] and [`ResponseCache::clear`].
#[derive(Debug)]
pub struct ResponseCache {
    capacity: usize,
    entries: HashMap<CacheKey, SearchResponse>,
    // front = least recently used
    order: VecDeque<CacheKey>,
}

impl ResponseCache {
    /// A capacity of 0 stores nothing
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<SearchResponse> {
        let response = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(response)
    }

    pub fn insert(&mut self, key: CacheKey, response: SearchResponse) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.insert(key.clone(), response).is_some() {
            self.touch(&key);
            return;
        }

        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn remove(&mut self, key: &CacheKey) -> Option<SearchResponse> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}
