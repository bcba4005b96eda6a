use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::error::{Error, ErrorKind};
use crate::errorstate::{Detail, ErrorState};

pub const REQUEST_BODY: &str = "HTTP request body";

/// Why a request body could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// `Content-Type` was missing or not exactly `application/json`.
    ContentType,
    /// The body continued past `limit` bytes before a value could be decoded.
    EntityTooLarge { limit: u64 },
    /// The body ended or went wrong within the limit.
    MalformedJson { reason: String },
}

impl DecodeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DecodeError::MalformedJson {
            reason: reason.into(),
        }
    }

    pub fn detail(&self) -> Detail {
        match self {
            DecodeError::ContentType => unexpected_content_type(),
            DecodeError::EntityTooLarge { limit } => entity_too_large(*limit),
            DecodeError::MalformedJson { reason } => malformed_json(reason),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DecodeError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DecodeError::EntityTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DecodeError::MalformedJson { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_state(&self) -> ErrorState {
        ErrorState::single(self.detail())
    }
}

pub fn unexpected_content_type() -> Detail {
    Detail::new(
        "HTTP",
        "header",
        "Content-Type",
        "unexpected content type",
        "Expecting 'application/json' content type.",
    )
}

pub fn entity_too_large(limit: u64) -> Detail {
    Detail::new(
        "HTTP",
        "reader",
        REQUEST_BODY,
        "request entity too large",
        format!("Request body size is limited to {limit} bytes."),
    )
}

pub fn malformed_json(reason: &str) -> Detail {
    Detail::new("JSON", "decode", REQUEST_BODY, reason, "Unable to parse JSON.")
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ContentType => f.write_str("unexpected content type"),
            DecodeError::EntityTooLarge { limit } => {
                write!(f, "request entity too large (limit {limit} bytes)")
            }
            DecodeError::MalformedJson { reason } => write!(f, "malformed JSON: {reason}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.error_state())).into_response()
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        let kind = match err {
            DecodeError::ContentType => ErrorKind::UnsupportedMediaType,
            DecodeError::EntityTooLarge { .. } => ErrorKind::TooLarge,
            DecodeError::MalformedJson { .. } => ErrorKind::Malformed,
        };
        let detail = err.detail();
        Error::new(kind)
            .with_message(detail.message.clone())
            .with_detail(detail)
            .with_source(err)
    }
}
