//! HTTP API for the santa relay.
//!
//! Runs on port 3000 by default. CORS-permissive so the prototype clients can
//! call from any host or port.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use santa_core::types::{
    AUDIO_MPEG, ChatRequest, ChatResponse, ELEVEN_LABS_API_KEY_VAR, OPENAI_API_KEY_VAR,
    RelayConfig, SERVER_RUNNING, SpeechRequest, StatusMessage,
};

use crate::error::{ApiError, RelayError, require_credential};
use crate::{chat, tts};

/// Process-wide handler state: immutable config plus a pooled HTTP client.
#[derive(Clone)]
pub struct RelayState {
    config: Arc<RelayConfig>,
    client: reqwest::Client,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: RelayConfig, client: reqwest::Client) -> Self {
        for (var, route) in missing_credentials(&config) {
            warn!("{var} not set, {route} will fail until it is");
        }
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Credentials that requests will reject, paired with the route they break.
fn missing_credentials(config: &RelayConfig) -> Vec<(&'static str, &'static str)> {
    [
        (config.openai_api_key.as_deref(), OPENAI_API_KEY_VAR, "/api/chat"),
        (config.elevenlabs_api_key.as_deref(), ELEVEN_LABS_API_KEY_VAR, "/api/tts"),
    ]
    .into_iter()
    .filter(|(value, var, _)| require_credential(*value, *var).is_err())
    .map(|(_, var, route)| (var, route))
    .collect()
}

/// Build the axum router with a shared [`RelayState`].
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/test", get(test))
        .route("/api/chat", post(chat))
        .route("/api/tts", post(speech))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn test() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: SERVER_RUNNING.to_string(),
    })
}

async fn chat(
    State(state): State<RelayState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::chat(invalid_body(e)))?;
    info!("chat: received {} bytes", req.message.len());

    let message = chat::santa_reply(&state.client, &state.config, &req.message)
        .await
        .map_err(ApiError::chat)?;

    Ok(Json(ChatResponse { message }))
}

async fn speech(
    State(state): State<RelayState>,
    body: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::speech(invalid_body(e)))?;
    info!("tts: received {} bytes", req.text.len());

    let upstream = tts::synthesize(&state.client, &state.config, &req.text)
        .await
        .map_err(ApiError::speech)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_MPEG));
    if let Some(len) = upstream.content_length() {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    info!("tts: relaying audio ({:?} bytes)", upstream.content_length());
    Ok((headers, Body::from_stream(upstream.bytes_stream())).into_response())
}

fn invalid_body(rejection: JsonRejection) -> RelayError {
    RelayError::InvalidRequest(rejection.body_text())
}
