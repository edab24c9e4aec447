use crate::config::Config;
use crate::error::ExtractionError;
use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PROMPT: &str = r#"あなたは食べログの検索用に最適化された日本語の自然言語処理モデルです。以下のユーザー入力から、食べログで検索に使う「area（エリア）」と「keyword（キーワード）」を抽出してください。キーは "area" と "keyword"、値は必ず日本語にしてください。エリアは地名（例: 東京、新宿、渋谷など）を簡潔に、キーワードは料理名やジャンル（例: 寿喜焼き、ラーメン）を返してください。値が特定できない場合は空文字 ("") を返してください。
出力は {"area": "...", "keyword": "..."} という JSON オブジェクトのみとしてください。

ユーザー入力:
{user_input}"#;

/// Area and keyword pulled out of free text; empty strings mean "unknown"
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedQuery {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub keyword: String,
}

/// Turns a free-text request into search terms
#[async_trait]
pub trait QueryExtractor: Send + Sync {
    async fn parse_user_input(&self, text: &str) -> Result<ExtractedQuery, ExtractionError>;
}

/// Extractor backed by an OpenAI chat model
pub struct OpenAiExtractor {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenAiExtractor {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ExtractionError> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or(ExtractionError::MissingApiKey)?;
        Ok(Self::new(api_key, config.llm_model.as_str()))
    }
}

#[async_trait]
impl QueryExtractor for OpenAiExtractor {
    async fn parse_user_input(&self, text: &str) -> Result<ExtractedQuery, ExtractionError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(build_prompt(text))
                .build()?
                .into()])
            .max_tokens(200_u32)
            .build()?;

        let response = self.client.chat().create(request).await?;
        debug!("Response: {:?}", response);

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(ExtractionError::NoStructuredResult)?;

        let query = parse_extraction(&content)?;
        info!("Extracted area={:?} keyword={:?}", query.area, query.keyword);
        Ok(query)
    }
}

pub fn build_prompt(user_input: &str) -> String {
    PROMPT.replace("{user_input}", user_input)
}

/// Read the model reply, tolerating a fenced ```json block around it
pub fn parse_extraction(content: &str) -> Result<ExtractedQuery, ExtractionError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::NoStructuredResult);
    }

    // replies cut off at the token limit lose the closing fence
    let body = match trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        Some(rest) => rest.trim_end().strip_suffix("```").unwrap_or(rest),
        None => trimmed,
    }
    .trim();

    let mut query: ExtractedQuery = serde_json::from_str(body)?;
    query.area = query.area.trim().to_string();
    query.keyword = query.keyword.trim().to_string();
    Ok(query)
}
