// src/quiz/reference.rs

use std::sync::LazyLock;

use regex::Regex;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,]").expect("static regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Reduces a reference to the single passage that gets looked up.
///
/// Only the first `;`/`,` separated citation is kept: "Ezekiel 10, 43"
/// becomes "Ezekiel 10".
pub fn normalize_reference(raw: &str) -> String {
    let first = SEPARATORS.split(raw).next().unwrap_or_default();
    WHITESPACE.replace_all(first.trim(), " ").into_owned()
}
