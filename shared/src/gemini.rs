//! Gemini `generateContent` client and wire types.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{error, info};

use crate::config::SearchSettings;
use crate::models::Product;
use crate::{Error, Result};

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<RequestContent>,
    pub tools: Vec<Tool>,
    pub system_instruction: RequestContent,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart {
    pub text: String,
}

impl RequestContent {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![RequestPart { text: text.into() }],
        }
    }
}

/// Tool declaration. Only search grounding is ever enabled.
#[derive(Debug, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl GenerateRequest {
    /// Build the request for a user query. Everything except the query text comes from settings.
    pub fn for_query(settings: &SearchSettings, user_query: &str) -> Self {
        Self {
            contents: vec![RequestContent::text(format!(
                "User's e-commerce query: \"{}\"",
                user_query
            ))],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            system_instruction: RequestContent::text(settings.system_instruction.as_str()),
            generation_config: GenerationConfig {
                max_output_tokens: settings.max_output_tokens,
                temperature: settings.temperature,
            },
        }
    }
}

/// Top-level `generateContent` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub candidates: Option<Vec<Candidate>>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    Safety,
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub finish_reason: Option<FinishReason>,
    pub content: Option<Content>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    pub grounding_attributions: Option<Vec<GroundingAttribution>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingAttribution {
    pub web: Option<WebSource>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GenerateResponse {
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.as_deref()?.first()
    }
}

impl Candidate {
    /// Text of the first part, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        let text = self
            .content
            .as_ref()?
            .parts
            .as_deref()?
            .first()?
            .text
            .as_deref()?;
        (!text.is_empty()).then_some(text)
    }

    /// Cited products, keeping only attributions with both fields set.
    pub fn products(&self, limit: usize) -> Vec<Product> {
        self.grounding_metadata
            .as_ref()
            .and_then(|metadata| metadata.grounding_attributions.as_deref())
            .unwrap_or_default()
            .iter()
            .filter_map(GroundingAttribution::product)
            .take(limit)
            .collect()
    }
}

impl GroundingAttribution {
    pub fn product(&self) -> Option<Product> {
        let web = self.web.as_ref()?;
        let uri = web.uri.as_deref().filter(|uri| !uri.is_empty())?;
        let title = web.title.as_deref().filter(|title| !title.is_empty())?;
        Some(Product {
            uri: uri.to_string(),
            title: title.to_string(),
        })
    }
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// Anything that can answer a `generateContent` request.
pub trait GenerativeClient {
    fn generate(
        &self,
        api_key: &str,
        request: &GenerateRequest,
    ) -> impl Future<Output = Result<GenerateResponse>> + Send;
}

/// Client for the hosted Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Create a new client for the endpoint described by `settings`.
    pub fn new(http_client: reqwest::Client, settings: &SearchSettings) -> Self {
        Self {
            http_client,
            endpoint: settings.endpoint(),
        }
    }
}

impl GenerativeClient for GeminiClient {
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        // The key travels in the query string, so transport errors are stripped of their URL
        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| Error::Transport(e.without_url()))?;
            error!(status = status.as_u16(), body = %body, "Gemini API error");

            let error_body: ApiErrorBody = serde_json::from_str(&body)?;
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: error_body.error.message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;
        info!(status = status.as_u16(), bytes = body.len(), "Gemini API responded");

        Ok(serde_json::from_slice(&body)?)
    }
}
