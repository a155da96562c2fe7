//! santa-core — Pure types, persona constants, and text processing.
//!
//! No async runtime, no I/O, no platform dependencies.

pub mod persona;
pub mod text_prep;
pub mod types;
