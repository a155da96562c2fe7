//! Mock upstream providers and request helpers shared by relay tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

use santa_lib::santa_core::types::RelayConfig;
use santa_lib::server::{RelayState, router};

pub const OPENAI_KEY: &str = "sk-test-openai";
pub const ELEVENLABS_KEY: &str = "xi-test-key";

/// Fixed reply a mock provider sends back.
#[derive(Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
    pub delay: Option<Duration>,
}

impl Canned {
    pub fn new(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(&self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body.clone(),
        )
            .into_response()
    }
}

/// A provider running on an ephemeral local port, recording what it received.
#[derive(Clone)]
pub struct MockProvider {
    pub url: String,
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockProvider {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request bodies in arrival order, paired with the path they were posted to.
    pub fn bodies(&self) -> Vec<(String, Value)> {
        self.bodies.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    canned: Option<Canned>,
}

impl MockState {
    fn record(&self, path: String, body: Value) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push((path, body));
    }
}

async fn spawn(app: Router<MockState>, canned: Option<Canned>) -> MockProvider {
    let hits = Arc::new(AtomicUsize::new(0));
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        hits: hits.clone(),
        bodies: bodies.clone(),
        canned,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.with_state(state)).await.unwrap();
    });

    MockProvider {
        url: format!("http://{addr}"),
        hits,
        bodies,
    }
}

// ─── OpenAI ────────────────────────────────────────────────────────────────

async fn completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/v1/chat/completions".into(), body.clone());

    let expected = format!("Bearer {OPENAI_KEY}");
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if auth != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Incorrect API key provided" } })),
        )
            .into_response();
    }

    if let Some(canned) = &state.canned {
        return canned.respond().await;
    }

    // Echo the user turn so each caller can recognise its own reply.
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": format!("Santa heard: {user}") },
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// OpenAI mock that answers every completion with `Santa heard: <user message>`.
pub async fn openai_echo() -> MockProvider {
    spawn(
        Router::new().route("/v1/chat/completions", post(completions)),
        None,
    )
    .await
}

/// OpenAI mock that always answers with `canned` (after checking the key).
pub async fn openai_canned(canned: Canned) -> MockProvider {
    spawn(
        Router::new().route("/v1/chat/completions", post(completions)),
        Some(canned),
    )
    .await
}

// ─── ElevenLabs ────────────────────────────────────────────────────────────

async fn text_to_speech(
    State(state): State<MockState>,
    Path(voice_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(format!("/v1/text-to-speech/{voice_id}"), body);

    let key = headers.get("xi-api-key").and_then(|v| v.to_str().ok());
    if key != Some(ELEVENLABS_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": { "status": "invalid_api_key" } })),
        )
            .into_response();
    }

    match &state.canned {
        Some(canned) => canned.respond().await,
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// ElevenLabs mock answering every synthesis call with `canned`.
pub async fn elevenlabs(canned: Canned) -> MockProvider {
    spawn(
        Router::new().route("/v1/text-to-speech/{voice_id}", post(text_to_speech)),
        Some(canned),
    )
    .await
}

/// ElevenLabs mock returning `audio` as a successful MPEG response.
pub async fn elevenlabs_audio(audio: Vec<u8>) -> MockProvider {
    elevenlabs(Canned::new(StatusCode::OK, "audio/mpeg", audio)).await
}

// ─── Relay ─────────────────────────────────────────────────────────────────

/// Config with both keys set, pointing at the given mock base URLs.
pub fn config(openai_url: &str, elevenlabs_url: &str) -> RelayConfig {
    RelayConfig {
        openai_api_key: Some(OPENAI_KEY.into()),
        openai_base_url: openai_url.into(),
        elevenlabs_api_key: Some(ELEVENLABS_KEY.into()),
        elevenlabs_base_url: elevenlabs_url.into(),
        ..RelayConfig::default()
    }
}

pub fn relay(config: RelayConfig) -> Router {
    router(RelayState::new(config))
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(resp: Response) -> Bytes {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}
