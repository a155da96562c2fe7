//! Error types for the relay, and their mapping onto the wire envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use santa_core::types::{CHAT_FAILED, ErrorEnvelope, SPEECH_FAILED, UpstreamResponse};

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Everything that can go wrong while serving one request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Provider credential absent from the environment. Raised before any I/O.
    #[error("{0} is not set in environment variables")]
    MissingCredential(&'static str),

    /// Network failure, timeout, or body read error
    #[error("{}", with_causes(.0))]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status
    #[error("Request failed with status code {status}")]
    UpstreamStatus {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    /// Provider body did not have the expected shape
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Inbound body could not be decoded
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RelayError {
    /// Turn a non-2xx provider response into [`RelayError::UpstreamStatus`],
    /// capturing its body as text. Successful responses pass through.
    pub async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .bytes()
            .await
            .ok()
            .map(|b| String::from_utf8_lossy(&b).into_owned());
        Err(Self::UpstreamStatus {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    /// The provider's reply, if this error carries one.
    pub fn upstream_response(&self) -> Option<UpstreamResponse> {
        match self {
            Self::UpstreamStatus {
                status,
                status_text,
                body,
            } => Some(UpstreamResponse {
                status: *status,
                status_text: status_text.clone(),
                data: body.clone(),
            }),
            _ => None,
        }
    }
}

/// reqwest's own message hides whether it was a timeout or a refused
/// connection; append every underlying cause.
fn with_causes(err: &reqwest::Error) -> String {
    let mut details = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        details.push_str(": ");
        details.push_str(&inner.to_string());
        cause = inner.source();
    }
    details
}

/// Look up a credential, treating blank values as missing.
pub(crate) fn require_credential<'a>(value: Option<&'a str>, var: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RelayError::MissingCredential(var))
}

/// A failed request, ready to render as an [`ErrorEnvelope`] with HTTP 500.
///
/// Handlers return `Result<_, ApiError>` and only describe the happy path;
/// the headline and upstream details are attached here.
#[derive(Debug)]
pub struct ApiError {
    headline: &'static str,
    with_upstream: bool,
    source: RelayError,
}

impl ApiError {
    /// Chat failures never expose the provider's response.
    pub fn chat(source: RelayError) -> Self {
        Self {
            headline: CHAT_FAILED,
            with_upstream: false,
            source,
        }
    }

    pub fn speech(source: RelayError) -> Self {
        Self {
            headline: SPEECH_FAILED,
            with_upstream: true,
            source,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.headline.to_string(),
            details: self.source.to_string(),
            response: if self.with_upstream {
                self.source.upstream_response()
            } else {
                None
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.source {
            RelayError::UpstreamStatus {
                status,
                status_text,
                body,
            } => error!(
                "{}: upstream {status} {status_text}: {}",
                self.headline,
                body.as_deref().unwrap_or("<no body>")
            ),
            other => error!("{}: {other}", self.headline),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.envelope())).into_response()
    }
}
