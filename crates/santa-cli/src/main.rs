//! santa CLI — chat/speech relay server and a small client for it.
//!
//! ```text
//! santa serve [--port 3000] [--host 0.0.0.0]
//! santa test [--server http://localhost:3000]
//! santa chat "What do reindeer eat?" [--server ...]
//! santa speak "Ho ho ho! Merry Christmas!" --out santa.mp3 [--server ...]
//! ```
//!
//! Provider keys come from `OPENAI_API_KEY` and `ELEVEN_LABS_API_KEY`; a
//! `.env` file in the working directory is loaded first if present.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use santa_lib::santa_core::persona::{CHAT_MODEL, FALLBACK_REPLY, SANTA_VOICE_ID};
use santa_lib::santa_core::types::{
    ChatRequest, ChatResponse, DEFAULT_ELEVENLABS_URL, DEFAULT_OPENAI_URL, DEFAULT_PORT,
    ErrorEnvelope, RelayConfig, SpeechRequest,
};
use santa_lib::server::{RelayState, router};

const DEFAULT_SERVER: &str = "http://localhost:3000";

/// santa — chat with Santa through an LLM and a TTS voice
#[derive(Parser)]
#[command(name = "santa", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the relay server
    Serve {
        /// Listen port
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Listen host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// OpenAI API key
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,
        /// OpenAI-compatible API base URL
        #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_URL)]
        openai_url: String,
        /// Chat completion model
        #[arg(long, env = "SANTA_CHAT_MODEL", default_value = CHAT_MODEL)]
        chat_model: String,
        /// ElevenLabs API key
        #[arg(long, env = "ELEVEN_LABS_API_KEY", hide_env_values = true)]
        elevenlabs_api_key: Option<String>,
        /// ElevenLabs API base URL
        #[arg(long, env = "ELEVEN_LABS_BASE_URL", default_value = DEFAULT_ELEVENLABS_URL)]
        elevenlabs_url: String,
        /// ElevenLabs voice id
        #[arg(long, env = "SANTA_VOICE_ID", default_value = SANTA_VOICE_ID)]
        voice: String,
        /// Upstream timeout for chat completions, in seconds
        #[arg(long, default_value = "10")]
        chat_timeout_secs: u64,
        /// Upstream timeout for speech synthesis, in seconds
        #[arg(long, default_value = "20")]
        speech_timeout_secs: u64,
    },
    /// Check that a relay is up
    Test {
        /// Server URL
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Send a message and print Santa's reply
    Chat {
        /// What to say to Santa
        message: String,
        /// Server URL
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Synthesize Santa's voice into an MP3 file
    Speak {
        /// Text to speak
        text: String,
        /// Output file
        #[arg(long, short, default_value = "santa.mp3")]
        out: PathBuf,
        /// Server URL
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            openai_api_key,
            openai_url,
            chat_model,
            elevenlabs_api_key,
            elevenlabs_url,
            voice,
            chat_timeout_secs,
            speech_timeout_secs,
        } => {
            let config = RelayConfig {
                openai_api_key,
                openai_base_url: openai_url,
                chat_model,
                elevenlabs_api_key,
                elevenlabs_base_url: elevenlabs_url,
                voice_id: voice,
                chat_timeout: Duration::from_secs(chat_timeout_secs),
                speech_timeout: Duration::from_secs(speech_timeout_secs),
            };
            let state = RelayState::new(config);
            info!(
                "relay: chat via {} ({}), voice {} via {}",
                state.config().openai_base_url,
                state.config().chat_model,
                state.config().voice_id,
                state.config().elevenlabs_base_url,
            );
            let app = router(state);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            info!("Server running on port {port}");

            axum::serve(listener, app).await.context("server error")?;
        }

        Command::Test { server } => println!("{}", check_running(&server).await?),

        Command::Chat { message, server } => match chat(&server, message).await {
            Ok(reply) => println!("{reply}"),
            Err(e) => {
                println!("{FALLBACK_REPLY}");
                return Err(e);
            }
        },

        Command::Speak { text, out, server } => {
            let resp = reqwest::Client::new()
                .post(format!("{server}/api/tts"))
                .json(&SpeechRequest { text })
                .send()
                .await
                .context("request failed")?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                bail!("speech failed ({status}): {}", describe_failure(&body));
            }

            let audio = resp.bytes().await.context("failed to read audio")?;
            tokio::fs::write(&out, &audio)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("wrote {} bytes to {}", audio.len(), out.display());
        }
    }

    Ok(())
}

async fn check_running(server: &str) -> anyhow::Result<String> {
    let resp = reqwest::Client::new()
        .get(format!("{server}/api/test"))
        .send()
        .await
        .context("request failed")?;

    let status = resp.status();
    let body = resp.text().await.context("failed to read reply")?;
    if !status.is_success() {
        bail!("relay not healthy ({status}): {body}");
    }
    Ok(body)
}

async fn chat(server: &str, message: String) -> anyhow::Result<String> {
    let resp = reqwest::Client::new()
        .post(format!("{server}/api/chat"))
        .json(&ChatRequest { message })
        .send()
        .await
        .context("request failed")?;

    let status = resp.status();
    let body = resp.text().await.context("failed to read reply")?;
    if !status.is_success() {
        bail!("chat failed ({status}): {}", describe_failure(&body));
    }

    let reply: ChatResponse = serde_json::from_str(&body).context("unexpected reply")?;
    Ok(reply.message)
}

/// Render an error envelope as one line, or fall back to the raw body.
fn describe_failure(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.response {
            Some(upstream) => format!(
                "{}: {} (upstream {} {})",
                envelope.error, envelope.details, upstream.status, upstream.status_text
            ),
            None => format!("{}: {}", envelope.error, envelope.details),
        },
        Err(_) => body.to_string(),
    }
}
