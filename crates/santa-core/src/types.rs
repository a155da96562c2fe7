//! Shared types for the santa relay and its clients.
//!
//! Wire shapes live here so HTTP clients can depend on them without pulling
//! in tokio, axum, or reqwest.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::persona::{CHAT_MODEL, SANTA_VOICE_ID};

// ─── Relay configuration ───────────────────────────────────────────────────

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_ELEVENLABS_URL: &str = "https://api.elevenlabs.io";
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SPEECH_TIMEOUT: Duration = Duration::from_secs(20);

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ELEVEN_LABS_API_KEY_VAR: &str = "ELEVEN_LABS_API_KEY";

/// Provider endpoints and credentials. Built once at startup, read-only after.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub voice_id: String,
    pub chat_timeout: Duration,
    pub speech_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_URL.into(),
            chat_model: CHAT_MODEL.into(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: DEFAULT_ELEVENLABS_URL.into(),
            voice_id: SANTA_VOICE_ID.into(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            speech_timeout: DEFAULT_SPEECH_TIMEOUT,
        }
    }
}

// ─── Chat ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Santa's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

// ─── Speech ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

pub const AUDIO_MPEG: &str = "audio/mpeg";

// ─── Liveness ──────────────────────────────────────────────────────────────

pub const SERVER_RUNNING: &str = "Server is running!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

// ─── Errors ────────────────────────────────────────────────────────────────

pub const CHAT_FAILED: &str = "Failed to get response";
pub const SPEECH_FAILED: &str = "Failed to generate speech";

/// Uniform failure body returned by every relay endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<UpstreamResponse>,
}

/// What the upstream provider answered, for diagnosing failed calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamResponse {
    pub status: u16,
    pub status_text: String,
    pub data: Option<String>,
}
