//! Natural ordering of diagnostic subjects.
//!
//! `EAMENA-2` sorts before `EAMENA-10`: digit runs compare by numeric value,
//! everything else compares as lower-cased text. Subjects that differ only
//! in case compare equal and keep their input order.

use std::cmp::Ordering;
use std::sync::LazyLock;

use bus_model::ErrorRecord;
use regex::Regex;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit run regex"));

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(&'a str),
    Number(&'a str),
}

/// Splits into alternating text and digit chunks, always starting with text.
fn chunks(text: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut last = 0;
    for found in DIGIT_RUN.find_iter(text) {
        chunks.push(Chunk::Text(&text[last..found.start()]));
        chunks.push(Chunk::Number(found.as_str()));
        last = found.end();
    }
    chunks.push(Chunk::Text(&text[last..]));
    chunks
}

fn compare_numbers(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let left = chunks(left);
    let right = chunks(right);
    for (a, b) in left.iter().zip(right.iter()) {
        let ordering = match (a, b) {
            (Chunk::Number(a), Chunk::Number(b)) => compare_numbers(a, b),
            (Chunk::Text(a), Chunk::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

/// Stable natural sort by subject.
pub fn sort_records(records: &mut [ErrorRecord]) {
    records.sort_by(|a, b| natural_cmp(&a.subject, &b.subject));
}
