use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value };

use crate::error::RelayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat turn. Fields other than `role` and `content` that the UI
/// attaches (message ids, timestamps) are kept so the conversation reaches
/// the upstream exactly as the client sent it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), extra: Map::new() }
    }
}

pub type Conversation = Vec<Message>;

/// Inbound body of `POST /api/chat`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Conversation,
}

impl ChatRequest {
    /// Syntax errors and shape errors are reported separately: the former
    /// become a 500 with details, the latter a 400.
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_slice(body).map_err(RelayError::MalformedBody)?;
        let request: ChatRequest = serde_json::from_value(value).map_err(|e|
            RelayError::InvalidRequest(e.to_string())
        )?;

        if request.messages.is_empty() {
            return Err(RelayError::InvalidRequest("Messages array is required".into()));
        }

        Ok(request)
    }
}

/// Outbound body sent to `{base}/api/chat`. Streaming is always requested.
#[derive(Debug, Serialize)]
pub struct RelayRequest<'a> {
    pub messages: &'a [Message],
    pub stream: bool,
}

impl<'a> RelayRequest<'a> {
    pub fn streaming(messages: &'a [Message]) -> Self {
        Self { messages, stream: true }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
    pub region: String,
    pub upstream: String,
    pub max_duration_secs: u64,
}
