//! Search request handling: validate, call Gemini, reshape the answer.

use tracing::{error, info, warn};

use crate::config::SearchSettings;
use crate::error::SERVER_ERROR_MESSAGE;
use crate::gemini::{FinishReason, GenerateRequest, GenerateResponse, GenerativeClient};
use crate::models::{MessageResponse, SearchRequest, SearchResponse};
use crate::{Error, Result};

/// Status code and serialized JSON body for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    pub status: u16,
    pub body: String,
}

impl SearchReply {
    fn json<T: serde::Serialize>(status: u16, data: &T) -> Self {
        match serde_json::to_string(data) {
            Ok(body) => Self { status, body },
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                Self {
                    status: 500,
                    body: format!(r#"{{"message":"{}"}}"#, SERVER_ERROR_MESSAGE),
                }
            }
        }
    }
}

/// Answer one search request. Every failure is turned into a reply.
pub async fn handle_search<C: GenerativeClient>(
    settings: &SearchSettings,
    client: &C,
    api_key: Option<&str>,
    body: &[u8],
) -> SearchReply {
    match search(settings, client, api_key, body).await {
        Ok(response) => SearchReply::json(200, &response),
        Err(err) => {
            log_failure(&err);
            SearchReply::json(err.status_code(), &MessageResponse::new(err.public_message()))
        }
    }
}

async fn search<C: GenerativeClient>(
    settings: &SearchSettings,
    client: &C,
    api_key: Option<&str>,
    body: &[u8],
) -> Result<SearchResponse> {
    let user_query = parse_query(body)?;
    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or(Error::MissingApiKey)?;

    info!(query_len = user_query.len(), "Processing search query");

    let request = GenerateRequest::for_query(settings, &user_query);
    let response = client.generate(api_key, &request).await?;

    interpret(&response, settings.max_products)
}

/// Extract a non-empty `userQuery` from the request body.
pub fn parse_query(body: &[u8]) -> Result<String> {
    let request: SearchRequest = serde_json::from_slice(body).map_err(|_| Error::InvalidQuery)?;
    request
        .user_query
        .filter(|query| !query.is_empty())
        .ok_or(Error::InvalidQuery)
}

/// Turn the first candidate into a frontend payload.
pub fn interpret(response: &GenerateResponse, max_products: usize) -> Result<SearchResponse> {
    let candidate = response
        .first_candidate()
        .ok_or_else(|| Error::InvalidUpstreamResponse("no candidates".to_string()))?;

    match (candidate.finish_reason, candidate.text()) {
        (Some(FinishReason::Stop), Some(text)) => Ok(SearchResponse {
            recommendation_text: text.to_string(),
            products: candidate.products(max_products),
        }),
        (Some(FinishReason::Safety), _) => Err(Error::SafetyBlocked),
        (reason, Some(text)) => {
            warn!(finish_reason = ?reason, "Returning recommendation without products");
            Ok(SearchResponse {
                recommendation_text: text.to_string(),
                products: Vec::new(),
            })
        }
        (reason, None) => Err(Error::InvalidUpstreamResponse(format!(
            "candidate has no text (finish reason {:?})",
            reason
        ))),
    }
}

fn log_failure(err: &Error) {
    match err {
        Error::InvalidQuery => warn!("Rejected search request: {}", err),
        Error::SafetyBlocked => warn!("{}", err),
        Error::Upstream { status, .. } => warn!(status, "Relaying upstream error"),
        Error::MissingApiKey => error!("{}", err),
        Error::InvalidUpstreamResponse(detail) => {
            error!(kind = "invalid_upstream_response", detail = %detail, "Error in search handler")
        }
        Error::Transport(_) | Error::Serialization(_) => {
            error!(kind = "internal", "Error in search handler: {}", err)
        }
    }
}
