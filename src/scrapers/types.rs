use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

static RESERVATION_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").expect("valid regex"));
static RESERVATION_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid regex"));

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result ordering offered by the search page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    /// PR listings first
    #[default]
    Standard,
    Ranking,
    ReviewCount,
    NewOpen,
}

impl SortType {
    pub const ALL: [SortType; 4] = [
        SortType::Standard,
        SortType::Ranking,
        SortType::ReviewCount,
        SortType::NewOpen,
    ];

    /// Value of the `SrtT` query parameter
    pub fn code(self) -> &'static str {
        match self {
            SortType::Standard => "trend",
            SortType::Ranking => "rt",
            SortType::ReviewCount => "rvcn",
            SortType::NewOpen => "nod",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortType::Standard => "standard",
            SortType::Ranking => "ranking",
            SortType::ReviewCount => "review_count",
            SortType::NewOpen => "new_open",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortType {
    type Err = ValidationError;

    /// Accepts either the variant name or the site code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        SortType::ALL
            .into_iter()
            .find(|sort| sort.name() == wanted || sort.code() == wanted)
            .ok_or_else(|| ValidationError::UnknownSortType(s.to_string()))
    }
}

/// Budget bands, lunch (`B0xx`) and dinner (`C0xx`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PriceRange {
    LunchUnder1000,
    Lunch1000To2000,
    Lunch2000To3000,
    Lunch3000To4000,
    Lunch4000To5000,
    Lunch5000To6000,
    Lunch6000To8000,
    Lunch8000To10000,
    Lunch10000To15000,
    Lunch15000To20000,
    Lunch20000To30000,
    LunchOver30000,
    DinnerUnder1000,
    Dinner1000To2000,
    Dinner2000To3000,
    Dinner3000To4000,
    Dinner4000To5000,
    Dinner5000To6000,
    Dinner6000To8000,
    Dinner8000To10000,
    Dinner10000To15000,
    Dinner15000To20000,
    Dinner20000To30000,
    DinnerOver30000,
}

impl PriceRange {
    pub const ALL: [PriceRange; 24] = [
        PriceRange::LunchUnder1000,
        PriceRange::Lunch1000To2000,
        PriceRange::Lunch2000To3000,
        PriceRange::Lunch3000To4000,
        PriceRange::Lunch4000To5000,
        PriceRange::Lunch5000To6000,
        PriceRange::Lunch6000To8000,
        PriceRange::Lunch8000To10000,
        PriceRange::Lunch10000To15000,
        PriceRange::Lunch15000To20000,
        PriceRange::Lunch20000To30000,
        PriceRange::LunchOver30000,
        PriceRange::DinnerUnder1000,
        PriceRange::Dinner1000To2000,
        PriceRange::Dinner2000To3000,
        PriceRange::Dinner3000To4000,
        PriceRange::Dinner4000To5000,
        PriceRange::Dinner5000To6000,
        PriceRange::Dinner6000To8000,
        PriceRange::Dinner8000To10000,
        PriceRange::Dinner10000To15000,
        PriceRange::Dinner15000To20000,
        PriceRange::Dinner20000To30000,
        PriceRange::DinnerOver30000,
    ];

    /// Value of the `LstCos` query parameter
    pub fn code(self) -> &'static str {
        match self {
            PriceRange::LunchUnder1000 => "B001",
            PriceRange::Lunch1000To2000 => "B002",
            PriceRange::Lunch2000To3000 => "B003",
            PriceRange::Lunch3000To4000 => "B004",
            PriceRange::Lunch4000To5000 => "B005",
            PriceRange::Lunch5000To6000 => "B006",
            PriceRange::Lunch6000To8000 => "B007",
            PriceRange::Lunch8000To10000 => "B008",
            PriceRange::Lunch10000To15000 => "B009",
            PriceRange::Lunch15000To20000 => "B010",
            PriceRange::Lunch20000To30000 => "B011",
            PriceRange::LunchOver30000 => "B012",
            PriceRange::DinnerUnder1000 => "C001",
            PriceRange::Dinner1000To2000 => "C002",
            PriceRange::Dinner2000To3000 => "C003",
            PriceRange::Dinner3000To4000 => "C004",
            PriceRange::Dinner4000To5000 => "C005",
            PriceRange::Dinner5000To6000 => "C006",
            PriceRange::Dinner6000To8000 => "C007",
            PriceRange::Dinner8000To10000 => "C008",
            PriceRange::Dinner10000To15000 => "C009",
            PriceRange::Dinner15000To20000 => "C010",
            PriceRange::Dinner20000To30000 => "C011",
            PriceRange::DinnerOver30000 => "C012",
        }
    }

    pub fn is_lunch(self) -> bool {
        self.code().starts_with('B')
    }

    /// Human readable band, matching the labels on the site
    pub fn label(self) -> &'static str {
        match self {
            PriceRange::LunchUnder1000 => "ランチ ～￥999",
            PriceRange::Lunch1000To2000 => "ランチ ￥1,000～￥1,999",
            PriceRange::Lunch2000To3000 => "ランチ ￥2,000～￥2,999",
            PriceRange::Lunch3000To4000 => "ランチ ￥3,000～￥3,999",
            PriceRange::Lunch4000To5000 => "ランチ ￥4,000～￥4,999",
            PriceRange::Lunch5000To6000 => "ランチ ￥5,000～￥5,999",
            PriceRange::Lunch6000To8000 => "ランチ ￥6,000～￥7,999",
            PriceRange::Lunch8000To10000 => "ランチ ￥8,000～￥9,999",
            PriceRange::Lunch10000To15000 => "ランチ ￥10,000～￥14,999",
            PriceRange::Lunch15000To20000 => "ランチ ￥15,000～￥19,999",
            PriceRange::Lunch20000To30000 => "ランチ ￥20,000～￥29,999",
            PriceRange::LunchOver30000 => "ランチ ￥30,000～",
            PriceRange::DinnerUnder1000 => "ディナー ～￥999",
            PriceRange::Dinner1000To2000 => "ディナー ￥1,000～￥1,999",
            PriceRange::Dinner2000To3000 => "ディナー ￥2,000～￥2,999",
            PriceRange::Dinner3000To4000 => "ディナー ￥3,000～￥3,999",
            PriceRange::Dinner4000To5000 => "ディナー ￥4,000～￥4,999",
            PriceRange::Dinner5000To6000 => "ディナー ￥5,000～￥5,999",
            PriceRange::Dinner6000To8000 => "ディナー ￥6,000～￥7,999",
            PriceRange::Dinner8000To10000 => "ディナー ￥8,000～￥9,999",
            PriceRange::Dinner10000To15000 => "ディナー ￥10,000～￥14,999",
            PriceRange::Dinner15000To20000 => "ディナー ￥15,000～￥19,999",
            PriceRange::Dinner20000To30000 => "ディナー ￥20,000～￥29,999",
            PriceRange::DinnerOver30000 => "ディナー ￥30,000～",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PriceRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PriceRange::ALL
            .into_iter()
            .find(|range| range.code() == wanted)
            .ok_or_else(|| ValidationError::UnknownPriceRange(s.to_string()))
    }
}

/// Independent on/off filters of the search form
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    pub online_booking_only: bool,
    pub seat_only: bool,
    pub new_open: bool,
    pub private_room: bool,
    pub parking: bool,
    pub smoking_allowed: bool,
    pub card_accepted: bool,
}

/// Validated, immutable search request.
///
/// Built through [`SearchRequest::builder`]; the orchestrator derives
/// per-page copies with [`SearchRequest::with_page`] and never changes the
/// caller's value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchRequest {
    area: Option<String>,
    keyword: Option<String>,
    reservation_date: Option<String>,
    reservation_time: Option<String>,
    party_size: Option<u32>,
    sort_type: SortType,
    page: u32,
    price_range: Option<PriceRange>,
    filters: SearchFilters,
    max_pages: u32,
    include_meta: bool,
    #[serde(skip)]
    timeout: Duration,
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::default()
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn reservation_date(&self) -> Option<&str> {
        self.reservation_date.as_deref()
    }

    pub fn reservation_time(&self) -> Option<&str> {
        self.reservation_time.as_deref()
    }

    pub fn party_size(&self) -> Option<u32> {
        self.party_size
    }

    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn price_range(&self) -> Option<PriceRange> {
        self.price_range
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn include_meta(&self) -> bool {
        self.include_meta
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Same request pointed at another results page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            area: None,
            keyword: None,
            reservation_date: None,
            reservation_time: None,
            party_size: None,
            sort_type: SortType::Standard,
            page: 1,
            price_range: None,
            filters: SearchFilters::default(),
            max_pages: 1,
            include_meta: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Collects search fields and validates them in [`SearchRequestBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct SearchRequestBuilder {
    area: Option<String>,
    keyword: Option<String>,
    reservation_date: Option<String>,
    reservation_time: Option<String>,
    party_size: Option<u32>,
    sort_type: Option<SortType>,
    page: Option<u32>,
    price_range: Option<PriceRange>,
    filters: SearchFilters,
    max_pages: Option<u32>,
    include_meta: Option<bool>,
    timeout: Option<Duration>,
}

impl SearchRequestBuilder {
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// `YYYYMMDD`
    pub fn reservation_date(mut self, date: impl Into<String>) -> Self {
        self.reservation_date = Some(date.into());
        self
    }

    /// `HHMM`
    pub fn reservation_time(mut self, time: impl Into<String>) -> Self {
        self.reservation_time = Some(time.into());
        self
    }

    pub fn party_size(mut self, party_size: u32) -> Self {
        self.party_size = Some(party_size);
        self
    }

    pub fn sort_type(mut self, sort_type: SortType) -> Self {
        self.sort_type = Some(sort_type);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn price_range(mut self, price_range: PriceRange) -> Self {
        self.price_range = Some(price_range);
        self
    }

    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn online_booking_only(mut self, on: bool) -> Self {
        self.filters.online_booking_only = on;
        self
    }

    pub fn seat_only(mut self, on: bool) -> Self {
        self.filters.seat_only = on;
        self
    }

    pub fn new_open(mut self, on: bool) -> Self {
        self.filters.new_open = on;
        self
    }

    pub fn private_room(mut self, on: bool) -> Self {
        self.filters.private_room = on;
        self
    }

    pub fn parking(mut self, on: bool) -> Self {
        self.filters.parking = on;
        self
    }

    pub fn smoking_allowed(mut self, on: bool) -> Self {
        self.filters.smoking_allowed = on;
        self
    }

    pub fn card_accepted(mut self, on: bool) -> Self {
        self.filters.card_accepted = on;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn include_meta(mut self, include_meta: bool) -> Self {
        self.include_meta = Some(include_meta);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SearchRequest, ValidationError> {
        if let Some(date) = &self.reservation_date {
            if !RESERVATION_DATE.is_match(date) {
                return Err(ValidationError::InvalidReservationDate(date.clone()));
            }
        }

        if let Some(time) = &self.reservation_time {
            if !RESERVATION_TIME.is_match(time) {
                return Err(ValidationError::InvalidReservationTime(time.clone()));
            }
        }

        if self.party_size == Some(0) {
            return Err(ValidationError::InvalidPartySize);
        }

        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ValidationError::InvalidPage);
        }

        let max_pages = self.max_pages.unwrap_or(1);
        if max_pages == 0 {
            return Err(ValidationError::InvalidMaxPages);
        }

        Ok(SearchRequest {
            area: trimmed(self.area),
            keyword: trimmed(self.keyword),
            reservation_date: self.reservation_date,
            reservation_time: self.reservation_time,
            party_size: self.party_size,
            sort_type: self.sort_type.unwrap_or_default(),
            page,
            price_range: self.price_range,
            filters: self.filters,
            max_pages,
            include_meta: self.include_meta.unwrap_or(true),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
