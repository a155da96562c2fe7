//! Text preparation for speech synthesis — pacing pauses for Santa's voice.
//!
//! Pure functions, no I/O.

use regex::Regex;
use std::sync::LazyLock;

use crate::persona::CATCHPHRASE;

// Compiled regexes — allocated once, reused across calls.
static RE_CATCHPHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){}", regex::escape(CATCHPHRASE))).unwrap());
static RE_SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,.!?])\s+").unwrap());

/// Add pauses so the synthesizer slows down around exclamations and questions.
///
/// Steps run in a fixed order:
/// 1. every case-insensitive catchphrase gets a trailing comma
///    (rewritten in its canonical capitalization);
/// 2. `!` becomes `, !` and `?` becomes `, ?`;
/// 3. whitespace after `,` `.` `!` `?` collapses to a single space.
pub fn prepare_speech_text(text: &str) -> String {
    let with_pause = format!("{CATCHPHRASE},");
    let mut c = RE_CATCHPHRASE.replace_all(text, with_pause.as_str()).into_owned();
    c = c.replace('!', ", !").replace('?', ", ?");
    RE_SPACE_AFTER_PUNCT.replace_all(&c, "${1} ").into_owned()
}
