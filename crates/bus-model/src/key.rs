//! Column key normalization.

use std::sync::LazyLock;

use regex::Regex;

static OUTSIDE_KEY_ALPHABET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z_]+").expect("Invalid key alphabet regex"));

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("Invalid underscore run regex"));

/// Derives the normalized column key for a node display name.
///
/// Spaces become `_`, the name is upper-cased, surrounding `_` are trimmed
/// and every run of characters outside `[A-Z_]` collapses to a single `_`.
///
/// `"Archaeological Date From (cal)"` becomes `ARCHAEOLOGICAL_DATE_FROM__CAL_`.
pub fn node_key(name: &str) -> String {
    let upper = name.replace(' ', "_").to_uppercase();
    OUTSIDE_KEY_ALPHABET
        .replace_all(upper.trim_matches('_'), "_")
        .into_owned()
}

/// Key used for tolerant header matching: repeated `_` collapse to one and
/// surrounding `_` are dropped, so `GE_ASSESSMENT__YES_NO_` and
/// `GE_ASSESSMENT_YES_NO` compare equal.
pub fn loose_key(key: &str) -> String {
    UNDERSCORE_RUN
        .replace_all(key, "_")
        .trim_matches('_')
        .to_string()
}
