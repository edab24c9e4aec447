use async_openai::error::OpenAIError;
use thiserror::Error;

/// Rejected search input, raised before anything touches the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("reservation_date must be YYYYMMDD, got '{0}'")]
    InvalidReservationDate(String),

    #[error("reservation_time must be HHMM, got '{0}'")]
    InvalidReservationTime(String),

    #[error("party_size must be a positive integer")]
    InvalidPartySize,

    #[error("page must be 1 or greater")]
    InvalidPage,

    #[error("max_pages must be 1 or greater")]
    InvalidMaxPages,

    #[error("unknown sort type '{0}'")]
    UnknownSortType(String),

    #[error("unknown price range code '{0}'")]
    UnknownPriceRange(String),
}

/// Failure while fetching a results page
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Tabelog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure while turning free text into an area/keyword pair
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("language model request failed: {0}")]
    Provider(#[from] OpenAIError),

    #[error("failed to parse user input: the model returned no structured result")]
    NoStructuredResult,

    #[error("failed to parse user input: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
