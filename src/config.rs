use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://tabelog.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4.1";

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub openai_api_key: Option<String>,
    pub llm_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load .env file if present
        let defaults = Self::default();

        Self {
            base_url: get_env_or_default("TABELOG_BASE_URL", &defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            user_agent: get_env_or_default("TABELOG_USER_AGENT", &defaults.user_agent),
            timeout: env::var("TABELOG_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            llm_model: get_env_or_default("TABELOG_LLM_MODEL", &defaults.llm_model),
        }
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/rst/rstsearch", self.base_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            openai_api_key: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
