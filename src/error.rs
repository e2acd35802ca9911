use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{ IntoResponse, Response },
    Json,
};
use thiserror::Error;

use crate::models::chat::ErrorBody;

pub const UPSTREAM_ERROR_MESSAGE: &str = "Error communicating with the API";
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request";
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid chat request";
pub const BODY_REJECTED_MESSAGE: &str = "Request body could not be read";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Every way a relay call can fail before response headers are committed.
/// Failures after that point only show up in the logs.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("invalid chat request: {0}")]
    InvalidRequest(String),

    /// The body never made it to parsing: too large, or the read failed.
    #[error("request body rejected ({status}): {reason}")]
    BodyRejected {
        status: StatusCode,
        reason: String,
    },

    #[error("upstream returned {status}: {body}")]
    Upstream {
        status: StatusCode,
        body: String,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => *status,
            RelayError::BodyRejected { status, .. } => *status,
            RelayError::MalformedBody(_) | RelayError::Transport(_) | RelayError::Config(_) =>
                StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing payload. Upstream bodies are never echoed back.
    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::Upstream { .. } =>
                ErrorBody {
                    error: UPSTREAM_ERROR_MESSAGE.into(),
                    details: None,
                },
            RelayError::InvalidRequest(reason) =>
                ErrorBody {
                    error: INVALID_REQUEST_MESSAGE.into(),
                    details: Some(reason.clone()),
                },
            RelayError::BodyRejected { reason, .. } =>
                ErrorBody {
                    error: BODY_REJECTED_MESSAGE.into(),
                    details: Some(details_or_unknown(reason.clone())),
                },
            RelayError::MalformedBody(e) =>
                ErrorBody {
                    error: INTERNAL_ERROR_MESSAGE.into(),
                    details: Some(details_or_unknown(e.to_string())),
                },
            RelayError::Transport(e) =>
                ErrorBody {
                    error: INTERNAL_ERROR_MESSAGE.into(),
                    details: Some(details_or_unknown(e.to_string())),
                },
            RelayError::Config(msg) =>
                ErrorBody {
                    error: INTERNAL_ERROR_MESSAGE.into(),
                    details: Some(details_or_unknown(msg.clone())),
                },
        }
    }
}

fn details_or_unknown(msg: String) -> String {
    if msg.trim().is_empty() { UNKNOWN_ERROR.to_string() } else { msg }
}

impl From<BytesRejection> for RelayError {
    fn from(rejection: BytesRejection) -> Self {
        RelayError::BodyRejected {
            status: rejection.status(),
            reason: rejection.body_text(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_keeps_status_and_hides_body() {
        let err = RelayError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "overloaded".into(),
        };
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": UPSTREAM_ERROR_MESSAGE }));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn invalid_request_is_client_error() {
        let err = RelayError::InvalidRequest("missing field `messages`".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().details.as_deref(), Some("missing field `messages`"));
    }

    #[test]
    fn body_rejection_keeps_its_status() {
        let err = RelayError::BodyRejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            reason: "length limit exceeded".into(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = err.body();
        assert_eq!(body.error, BODY_REJECTED_MESSAGE);
        assert_eq!(body.details.as_deref(), Some("length limit exceeded"));
    }

    #[test]
    fn empty_details_fall_back_to_unknown() {
        let err = RelayError::Config("  ".into());
        assert_eq!(err.body().details.as_deref(), Some(UNKNOWN_ERROR));
    }

    #[test]
    fn malformed_body_is_internal_error_with_details() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = RelayError::MalformedBody(parse_err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, INTERNAL_ERROR_MESSAGE);
        assert!(!body.details.unwrap().is_empty());
    }
}
