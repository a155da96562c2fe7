//! Speech synthesis — pace the text, send it to ElevenLabs, hand back the
//! audio response for streaming.
//!
//! ```text
//! synthesize("text") → prepare_speech_text → POST /v1/text-to-speech/{voice}
//!     → check status → reqwest::Response (audio/mpeg body, not yet read)
//! ```
//!
//! The body is left unread so the HTTP layer can relay it chunk by chunk.

use serde::Serialize;
use tracing::debug;

use santa_core::persona::{SANTA_VOICE, SPEECH_MODEL, VoiceSettings};
use santa_core::text_prep::prepare_speech_text;
use santa_core::types::{AUDIO_MPEG, ELEVEN_LABS_API_KEY_VAR, RelayConfig};

use crate::error::{RelayError, Result, require_credential};

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Synthesize Santa's voice for `text`.
///
/// Fails with [`RelayError::MissingCredential`] before any network call when
/// the ElevenLabs key is absent. On success the returned response has a 2xx
/// status and an unread MPEG body.
pub async fn synthesize(
    client: &reqwest::Client,
    config: &RelayConfig,
    text: &str,
) -> Result<reqwest::Response> {
    let paced = prepare_speech_text(text);

    let api_key = require_credential(
        config.elevenlabs_api_key.as_deref(),
        ELEVEN_LABS_API_KEY_VAR,
    )?;
    let url = format!(
        "{}/v1/text-to-speech/{}",
        config.elevenlabs_base_url.trim_end_matches('/'),
        config.voice_id
    );

    let body = SynthesisRequest {
        text: &paced,
        model_id: SPEECH_MODEL,
        voice_settings: SANTA_VOICE,
    };

    debug!("tts: POST {} bytes to voice {}", paced.len(), config.voice_id);

    let resp = client
        .post(&url)
        .header(reqwest::header::ACCEPT, AUDIO_MPEG)
        .header("xi-api-key", api_key)
        .timeout(config.speech_timeout)
        .json(&body)
        .send()
        .await?;

    RelayError::check_status(resp).await
}
