//! Generative-answer providers: prompt in, text out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GenerationError;
use crate::models::ProviderConfig;

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiGenerationClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGenerationClient {
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.generation_model.clone(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl AnswerGenerator for GeminiGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::ConnectionError(e.to_string())
                } else {
                    GenerationError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServerError(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
