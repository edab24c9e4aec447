pub mod meta;
pub mod params;
pub mod parser;
pub mod selectors;
pub mod tabelog;
pub mod traits;
pub mod types;

pub use meta::parse_meta;
pub use params::{build_params, QueryParams};
pub use parser::parse_restaurants;
pub use tabelog::{BlockingTabelogClient, TabelogClient};
pub use traits::{BlockingPageFetcher, FetchedPage, PageFetcher};
pub use types::{PriceRange, SearchFilters, SearchRequest, SearchRequestBuilder, SortType};
