pub mod stream;

use std::time::Duration;

use axum::{
    body::{ Body, Bytes },
    extract::rejection::BytesRejection,
    http::header,
    response::{ IntoResponse, Response },
};
use log::{ debug, error, info, warn };
use reqwest::Client as HttpClient;
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::models::chat::{ ChatRequest, Message, RelayRequest };
use self::stream::RelayStream;

pub const STREAM_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Forwards conversations to the upstream chat service and streams its reply
/// back. Holds no per-request state; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Relay {
    http: HttpClient,
    endpoint: String,
    max_duration: Duration,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        // The client timeout spans connect, headers and the whole body.
        let http = HttpClient::builder().timeout(config.max_duration).build()?;

        Ok(Self {
            http,
            endpoint: config.chat_endpoint(),
            max_duration: config.max_duration,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Sends one request upstream and turns a successful reply into a
    /// streaming response. Never retries.
    pub async fn forward(
        &self,
        messages: &[Message],
        request_id: Uuid
    ) -> Result<Response, RelayError> {
        debug!(
            "[{}] Forwarding {} message(s) to {}",
            request_id,
            messages.len(),
            self.endpoint
        );

        let upstream = self.http
            .post(&self.endpoint)
            .json(&RelayRequest::streaming(messages))
            .send().await?;

        let status = upstream.status();
        if !status.is_success() {
            let body = match upstream.text().await {
                Ok(text) => text,
                Err(e) => format!("<failed to read upstream error body: {}>", e),
            };
            return Err(RelayError::Upstream { status, body });
        }

        info!("[{}] Upstream accepted chat request ({}), streaming reply", request_id, status);
        let body = Body::from_stream(RelayStream::new(upstream.bytes_stream(), request_id));

        Ok(([(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)], body).into_response())
    }

    /// Entry point for `POST /api/chat`. Takes the body extraction result as
    /// is, so an oversized or unreadable body goes through the same JSON
    /// error path as everything else. Every failure is logged and mapped here.
    pub async fn relay_chat(&self, body: Result<Bytes, BytesRejection>) -> Response {
        let request_id = Uuid::new_v4();

        let parsed = body
            .map_err(RelayError::from)
            .and_then(|body| ChatRequest::parse(&body));

        let result = match parsed {
            Ok(request) => self.forward(&request.messages, request_id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                log_failure(request_id, &err);
                err.into_response()
            }
        }
    }
}

fn log_failure(request_id: Uuid, err: &RelayError) {
    match err {
        RelayError::Upstream { status, body } => {
            error!("[{}] Backend API error ({}): {}", request_id, status, body);
        }
        RelayError::InvalidRequest(reason) => {
            warn!("[{}] Rejected chat request: {}", request_id, reason);
        }
        RelayError::BodyRejected { status, reason } => {
            warn!("[{}] Rejected chat request body ({}): {}", request_id, status, reason);
        }
        RelayError::Transport(e) if e.is_timeout() => {
            error!("[{}] Upstream call timed out: {}", request_id, e);
        }
        other => {
            error!("[{}] Error in chat route: {}", request_id, other);
        }
    }
}
