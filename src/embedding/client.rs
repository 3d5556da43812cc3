//! OpenAI embeddings client
//!
//! Endpoint: POST {base_url}/embeddings with an explicit `dimensions`
//! parameter so the returned vectors match the indexed collection.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::embedding::Embedder;
use crate::errors::{RagError, Result};

/// Embeddings client for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: u32,
}

impl OpenAIEmbeddings {
    /// Create embeddings client
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        dimensions: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RagError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            dimensions,
        })
    }

    /// Get model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get output dimensionality
    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    fn request_body<'a>(&'a self, input: &'a str) -> EmbeddingRequest<'a> {
        EmbeddingRequest {
            model: &self.model,
            input,
            dimensions: self.dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbeddings {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| RagError::EmbeddingError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagError::EmbeddingError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::EmbeddingError(format!("Failed to parse response: {}", e)))?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RagError::EmbeddingError("Response contained no embedding".to_string()))?;

        if embedding.len() != self.dimensions as usize {
            return Err(RagError::EmbeddingError(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }
}

/// Embeddings request
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: u32,
}

/// Embeddings response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
