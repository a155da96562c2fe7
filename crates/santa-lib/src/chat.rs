//! LLM chat client — one completion per request, Santa persona prepended.
//!
//! No conversation history: the caller's message is the only user turn.

use serde::{Deserialize, Serialize};
use tracing::debug;

use santa_core::persona::{CHAT_MAX_TOKENS, CHAT_TEMPERATURE, SANTA_SYSTEM_PROMPT};
use santa_core::types::{OPENAI_API_KEY_VAR, RelayConfig};

use crate::error::{RelayError, Result, require_credential};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Ask the LLM for Santa's reply to `message`.
///
/// The message is forwarded as-is, empty or not. Nothing is retried.
pub async fn santa_reply(
    client: &reqwest::Client,
    config: &RelayConfig,
    message: &str,
) -> Result<String> {
    let api_key = require_credential(config.openai_api_key.as_deref(), OPENAI_API_KEY_VAR)?;
    let url = format!(
        "{}/v1/chat/completions",
        config.openai_base_url.trim_end_matches('/')
    );

    let body = CompletionRequest {
        model: &config.chat_model,
        messages: [
            CompletionMessage {
                role: "system",
                content: SANTA_SYSTEM_PROMPT,
            },
            CompletionMessage {
                role: "user",
                content: message,
            },
        ],
        max_tokens: CHAT_MAX_TOKENS,
        temperature: CHAT_TEMPERATURE,
    };

    debug!("chat: POST {} bytes to {url}", message.len());

    let resp = client
        .post(&url)
        .bearer_auth(api_key)
        .timeout(config.chat_timeout)
        .json(&body)
        .send()
        .await?;
    let resp = RelayError::check_status(resp).await?;
    let raw = resp.bytes().await?;

    parse_completion(&raw)
}

/// Pull the first choice's text out of a completion body.
fn parse_completion(raw: &[u8]) -> Result<String> {
    let completion: CompletionResponse = serde_json::from_slice(raw)
        .map_err(|e| RelayError::MalformedResponse(format!("invalid completion JSON: {e}")))?;

    completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| RelayError::MalformedResponse("completion has no choices".into()))?
        .message
        .content
        .ok_or_else(|| RelayError::MalformedResponse("first choice has no content".into()))
}
