//! Embedding providers: text in, fixed-length vector out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::ProviderConfig;

/// Anything that can turn one text into one embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

/// Request body for the `:embedContent` endpoint.
#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

/// Client for the Gemini `embedContent` API.
#[derive(Debug, Clone)]
pub struct GeminiEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiEmbeddingClient {
    pub fn new(config: &ProviderConfig, api_key: &str) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);
        let request = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part { text }],
            },
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
                    EmbeddingError::Timeout
                } else if e.is_connect() {
                    EmbeddingError::ConnectionError(e.to_string())
                } else {
                    EmbeddingError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        match body.embedding {
            Some(embedding) if !embedding.values.is_empty() => Ok(embedding.values),
            _ => Err(EmbeddingError::InvalidResponse(
                "response contained no embedding values".to_string(),
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ProviderConfig {
        ProviderConfig {
            base_url: format!("{}/v1beta/", server.uri()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_base_url_trimming() {
        let config = ProviderConfig {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..Default::default()
        };
        let client = GeminiEmbeddingClient::new(&config, "key").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1beta");
        assert_eq!(client.model_name(), "text-embedding-004");
    }

    #[tokio::test]
    async fn test_embed_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/text-embedding-004:embedContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "hello"}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": {"values": [0.25, -0.5, 1.0]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiEmbeddingClient::new(&config_for(&server), "test-key").unwrap();
        let vector = client.embed("hello").await.unwrap();
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_embed_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiEmbeddingClient::new(&config_for(&server), "k").unwrap();
        match client.embed("hello").await {
            Err(EmbeddingError::ServerError(msg)) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("quota exceeded"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embed_missing_values() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = GeminiEmbeddingClient::new(&config_for(&server), "k").unwrap();
        assert!(matches!(
            client.embed("hello").await,
            Err(EmbeddingError::InvalidResponse(_))
        ));
    }
}
