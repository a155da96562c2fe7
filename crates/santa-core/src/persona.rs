//! The fixed Santa persona — prompt, sampling, and voice profile.

use serde::Serialize;

/// Phrase the synthesizer should pause after.
pub const CATCHPHRASE: &str = "Ho ho ho";

pub const SANTA_SYSTEM_PROMPT: &str = "You are Santa Claus talking to a child. \
Keep responses very short (max 2 sentences) and child-friendly. \
Speak warmly and gently. Do not say 'Ho ho ho' or sign your messages.";

pub const CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const CHAT_MAX_TOKENS: u32 = 100;
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Deep male ElevenLabs voice.
pub const SANTA_VOICE_ID: &str = "knrPHWnBmmDHMoiMeP3l";
pub const SPEECH_MODEL: &str = "eleven_monolingual_v1";

/// ElevenLabs `voice_settings` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub speaking_rate: f32,
}

/// Gentle, slow, grandfatherly delivery.
pub const SANTA_VOICE: VoiceSettings = VoiceSettings {
    stability: 0.80,
    similarity_boost: 0.45,
    style: 0.30,
    speaking_rate: 0.75,
};

/// In-character line clients show when the relay can't produce a reply.
pub const FALLBACK_REPLY: &str =
    "Ho ho ho! Santa's magic phone seems to be having trouble. Let's try again!";
