//! Tabelog restaurant search: request building, result page parsing and
//! multi-page orchestration.

pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod scrapers;
pub mod search;

pub use config::Config;
pub use error::{ExtractionError, TransportError, ValidationError};
pub use llm::{parse_extraction, ExtractedQuery, OpenAiExtractor, QueryExtractor};
pub use models::{Restaurant, SearchMeta, SearchResponse, SearchStatus};
pub use scrapers::{
    build_params, parse_meta, parse_restaurants, BlockingPageFetcher, BlockingTabelogClient,
    FetchedPage, PageFetcher, PriceRange, QueryParams, SearchFilters, SearchRequest,
    SearchRequestBuilder, SortType, TabelogClient,
};
pub use search::cache::{CacheKey, ResponseCache};
pub use search::{SearchOrchestrator, SharedCache};
