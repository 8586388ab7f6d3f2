//! Internal HTTP client implementation for OpenAI-compatible APIs

use crate::completion::{CompletionEngine, CompletionRequest, Message};
use crate::config::Config;
use crate::embeddings::EmbeddingEngine;
use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Blocking client for the embeddings and chat completions endpoints
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    http: HttpClient,
    embedding_model: String,
    chat_model: String,
}

impl Client {
    /// Build a client from configuration and a credential
    ///
    /// Every request carries the configured timeout; expiry surfaces as an
    /// ordinary request error.
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            http,
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
        })
    }

    fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<reqwest::blocking::Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            anyhow::bail!("{} failed ({}): {}", endpoint, status, body);
        }

        Ok(response)
    }
}

impl EmbeddingEngine for Client {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.embedding_model,
        };

        let response: EmbeddingResponse = self
            .post("embeddings", &request)?
            .json()
            .context("Failed to parse embeddings response")?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow::anyhow!("embeddings response contained no data"))
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}

impl CompletionEngine for Client {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.chat_model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response: ChatResponse = self
            .post("chat/completions", &body)?
            .json()
            .context("Failed to parse chat completion response")?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("chat completion contained no message content"))
    }
}

/// Embeddings request body
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
