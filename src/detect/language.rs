//! Character allow-list check for questions.
//!
//! Questions are expected in English, possibly with the accented Latin
//! letters and typographic punctuation common in English text.

use regex::Regex;
use std::sync::OnceLock;

static LATIN_ONLY: OnceLock<Regex> = OnceLock::new();

fn latin_only_pattern() -> &'static Regex {
    LATIN_ONLY.get_or_init(|| {
        Regex::new(concat!(
            r"^[A-Za-z0-9",
            r"À-ÖØ-öø-ÿ", // Latin-1 Supplement letters
            r"ÆæŒœ",
            r"ÑñÇç",
            r"ÜüŸ",
            r"¿¡",
            r#""'“”‘’«»–—…"#,
            r"!#$%&()*+,\-./:;<=>?@\[\]\\\^_`{|}~",
            r"\s",
            r"]+$",
        ))
        .expect("valid regex")
    })
}

/// Returns true when every character of `question` is on the allow-list.
///
/// The empty string does not pass.
pub fn only_latin_characters(question: &str) -> bool {
    latin_only_pattern().is_match(question)
}
