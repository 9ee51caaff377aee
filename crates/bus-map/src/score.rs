//! Near-match suggestions for rejected concept labels.
//!
//! Uses Jaro-Winkler similarity on lower-cased labels.

use rapidfuzz::distance::jaro_winkler;

/// Minimum similarity for a label to be offered as a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Returns the most similar label, if any scores at least
/// [`SUGGESTION_THRESHOLD`]. Ties keep the earlier label.
pub fn closest_label<'a>(input: &str, labels: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let needle = input.trim().to_lowercase();
    let mut best: Option<(&str, f64)> = None;
    for label in labels {
        let score = jaro_winkler::similarity(needle.chars(), label.to_lowercase().chars());
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((label, score));
        }
    }
    best.map(|(label, _)| label)
}
