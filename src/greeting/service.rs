//! `GreetingGenerator` trait and the HTTP-backed `ApiGreetingService`.
//!
//! `ApiGreetingService` talks to any OpenAI-compatible streaming
//! `/chat/completions` endpoint (Groq by default). Endpoint, token, model
//! and timeout all come from [`GreetingConfig`].

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

use crate::config::GreetingConfig;
use crate::greeting::prompt::PromptBuilder;
use crate::greeting::stream::{single_line, SseDecoder};

// ---------------------------------------------------------------------------
// GreetingError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating a greeting.
#[derive(Debug, Error)]
pub enum GreetingError {
    /// Token or name is blank; the setup flow has to run first.
    #[error("API token and name are required")]
    MissingCredentials,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("greeting request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status (bad token, unknown model …).
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The streamed body could not be decoded.
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// The stream finished without any text.
    #[error("API returned an empty greeting")]
    EmptyResponse,
}

impl From<reqwest::Error> for GreetingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GreetingError::Timeout
        } else {
            GreetingError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GreetingGenerator trait
// ---------------------------------------------------------------------------

/// Produces one single-line greeting per call.
///
/// Implementors must be `Send + Sync` so they can sit behind an
/// `Arc<dyn GreetingGenerator>` and run on the tokio runtime.
#[async_trait]
pub trait GreetingGenerator: Send + Sync {
    async fn generate(&self, config: &GreetingConfig) -> Result<String, GreetingError>;
}

// ---------------------------------------------------------------------------
// GreetingStream
// ---------------------------------------------------------------------------

/// Lazy, finite sequence of text deltas from one streamed response.
///
/// Not restartable: once [`next_chunk`](Self::next_chunk) returns
/// `Ok(None)` the response body is exhausted.
pub struct GreetingStream {
    response: reqwest::Response,
    decoder: SseDecoder,
    queued: VecDeque<String>,
    finished: bool,
}

impl GreetingStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            decoder: SseDecoder::new(),
            queued: VecDeque::new(),
            finished: false,
        }
    }

    /// Next text delta, or `None` at the end of the stream.
    pub async fn next_chunk(&mut self) -> Result<Option<String>, GreetingError> {
        loop {
            if let Some(delta) = self.queued.pop_front() {
                return Ok(Some(delta));
            }
            if self.finished {
                return Ok(None);
            }

            match self.response.chunk().await? {
                Some(bytes) => {
                    let deltas = self.decoder.push(&bytes)?;
                    self.queued.extend(deltas);
                    self.finished = self.decoder.is_done();
                }
                None => {
                    self.queued.extend(self.decoder.finish()?);
                    self.finished = true;
                }
            }
        }
    }

    /// Drain the stream and join every delta.
    pub async fn collect(mut self) -> Result<String, GreetingError> {
        let mut message = String::new();
        while let Some(delta) = self.next_chunk().await? {
            message.push_str(&delta);
        }
        Ok(message)
    }
}

// ---------------------------------------------------------------------------
// ApiGreetingService
// ---------------------------------------------------------------------------

/// Streams a greeting from an OpenAI-compatible chat-completions endpoint.
pub struct ApiGreetingService {
    client: reqwest::Client,
}

impl ApiGreetingService {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Use a preconfigured client (proxy, TLS roots, connection pool).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// JSON body for one greeting request: a single system message, no
    /// history, maximum temperature, no stop sequences.
    pub fn request_body<Tz: TimeZone>(
        config: &GreetingConfig,
        now: &DateTime<Tz>,
    ) -> serde_json::Value
    where
        Tz::Offset: std::fmt::Display,
    {
        let prompt =
            PromptBuilder::new(config.language, config.prompt.as_deref()).build(&config.name, now);

        serde_json::json!({
            "model":                 config.model,
            "messages": [
                { "role": "system", "content": prompt }
            ],
            "temperature":           1.0,
            "max_completion_tokens": 1024,
            "top_p":                 1.0,
            "stream":                true,
            "stop":                  null
        })
    }

    /// Send the request and hand back the undrained delta stream.
    pub async fn stream(&self, config: &GreetingConfig) -> Result<GreetingStream, GreetingError> {
        if !config.is_complete() {
            return Err(GreetingError::MissingCredentials);
        }

        let body = Self::request_body(config, &Local::now());
        log::info!("Requesting greeting from {} (model={})", config.endpoint, config.model);

        let response = self
            .client
            .post(&config.endpoint)
            .bearer_auth(config.token.trim())
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GreetingError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(GreetingStream::new(response))
    }
}

impl Default for ApiGreetingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GreetingGenerator for ApiGreetingService {
    async fn generate(&self, config: &GreetingConfig) -> Result<String, GreetingError> {
        let text = single_line(&self.stream(config).await?.collect().await?);
        if text.is_empty() {
            return Err(GreetingError::EmptyResponse);
        }
        log::debug!("Greeting received ({} chars)", text.chars().count());
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
