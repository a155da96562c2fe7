//! santa-lib — Relay engine.
//!
//! LLM chat, speech synthesis passthrough, error envelopes, and HTTP API.
//! Depends on santa-core for wire types, persona, and text processing.

pub mod chat;
pub mod error;
pub mod server;
pub mod tts;

// Re-export santa-core for convenience
pub use santa_core;
