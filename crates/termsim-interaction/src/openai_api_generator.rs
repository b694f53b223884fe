//! OpenAIApiGenerator - Direct REST API implementation for OpenAI chat models.
//!
//! Renders each `GenerationRequest` with the built-in prompt templates and
//! sends it to the Chat Completions endpoint as a single user message.
//! The API key comes from `OPENAI_API_KEY`; model, endpoint, temperature and
//! timeout come from `GeneratorConfig`.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use termsim_core::config::GeneratorConfig;
use termsim_core::{GenerationRequest, Result, TermsimError, TextGenerator};

use crate::prompts::render_prompt;

/// Generator implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiGenerator {
    client: Client,
    api_key: String,
    config: GeneratorConfig,
}

impl OpenAIApiGenerator {
    /// Creates a generator with an HTTP client bounded by the configured timeout.
    pub fn new(api_key: impl Into<String>, config: GeneratorConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TermsimError::config("OpenAI API key is empty"));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TermsimError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            config,
        })
    }

    /// Reads the API key from `OPENAI_API_KEY`.
    pub fn try_from_env(config: GeneratorConfig) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| TermsimError::config("OPENAI_API_KEY not found in environment variables"))?;
        Self::new(api_key, config)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: String) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.config.api_base)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    TermsimError::timeout("OpenAI API request", self.config.request_timeout())
                } else {
                    TermsimError::Generation {
                        message: format!("OpenAI API request failed: {err}"),
                        retryable: err.is_connect(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            TermsimError::generation(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for OpenAIApiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt = render_prompt(request)?;
        let body = self.build_request(prompt);

        tracing::debug!(
            model = %self.config.model,
            prompt = request.kind.label(),
            "sending generation request"
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TermsimError::generation("OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> TermsimError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    let message = match retry_after {
        Some(delay) => format!(
            "OpenAI API returned {}: {} (retry after {}s)",
            status.as_u16(),
            message,
            delay.as_secs()
        ),
        None => format!("OpenAI API returned {}: {}", status.as_u16(), message),
    };

    TermsimError::Generation { message, retryable }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
