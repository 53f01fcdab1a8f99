//! Gemini API client for text generation.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Role};
use super::{CompletionRequest, TextCompletion};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone; the HTTP client and endpoint are shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| GeminiError::Parse(format!("Invalid API key format: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: format!("{GEMINI_API_BASE}/models/{}:generateContent", config.model),
                model: config.model.clone(),
            }),
        })
    }

    /// Call `generateContent` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with an error.
    #[instrument(skip(self, request), fields(model = %self.inner.model, turns = request.contents.len()))]
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        Ok(parsed)
    }

    /// Map an error status code to a `GeminiError`.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_error_body(&body),
            Err(e) => GeminiError::Http(e),
        }
    }
}

impl TextCompletion for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GeminiError> {
        let response = self.generate_content(&build_request(request)).await?;

        if let Some(reason) = response.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        response.text().ok_or(GeminiError::EmptyResponse)
    }
}

/// Turn a provider-neutral completion request into a Gemini request body.
fn build_request(request: CompletionRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request.history.iter().map(Content::from).collect();
    contents.push(Content::text(Role::User, request.prompt));

    GenerateContentRequest {
        contents,
        generation_config: request.generation,
    }
}

/// Parse an error body, keeping the raw text when it is not the API's shape.
fn parse_error_body(body: &str) -> GeminiError {
    serde_json::from_str::<ApiErrorResponse>(body).map_or_else(
        |_| GeminiError::Api {
            status: "UNKNOWN".to_string(),
            message: body.to_string(),
        },
        |api_error| GeminiError::Api {
            status: api_error.error.status,
            message: api_error.error.message,
        },
    )
}
