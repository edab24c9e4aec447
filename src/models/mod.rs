use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core restaurant data model, one per item node on a results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    pub name: String,
    /// Always absolute
    pub url: String,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub save_count: Option<u32>,
    pub area: Option<String>,
    pub station: Option<String>,
    pub distance: Option<String>,
    pub genres: Vec<String>,
    pub description: Option<String>,
    /// Display string as shown on the site, e.g. "ランチ ￥1,000～￥1,999"
    pub lunch_price: Option<String>,
    pub dinner_price: Option<String>,
    pub has_vpoint: bool,
    pub has_reservation: bool,
    pub image_urls: Vec<String>,
}

impl Restaurant {
    /// A record with only the required fields set
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            rating: None,
            review_count: None,
            save_count: None,
            area: None,
            station: None,
            distance: None,
            genres: Vec::new(),
            description: None,
            lunch_price: None,
            dinner_price: None,
            has_vpoint: false,
            has_reservation: false,
            image_urls: Vec::new(),
        }
    }
}

/// Pagination and result-count metadata, read from the first results page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMeta {
    pub total_count: u32,
    pub current_page: u32,
    pub results_per_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub search_time: DateTime<Utc>,
}

/// Outcome of one orchestrated search
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Success,
    NoResults,
    Error,
}

/// Terminal artifact of one orchestrated search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub restaurants: Vec<Restaurant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<SearchMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SearchResponse {
    /// Classify collected restaurants as success or no results
    pub fn completed(restaurants: Vec<Restaurant>, meta: Option<SearchMeta>) -> Self {
        let status = if restaurants.is_empty() {
            SearchStatus::NoResults
        } else {
            SearchStatus::Success
        };

        Self {
            status,
            restaurants,
            meta,
            error_message: None,
        }
    }

    /// Failed search; never carries partial results
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error,
            restaurants: Vec::new(),
            meta: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == SearchStatus::Error
    }
}
