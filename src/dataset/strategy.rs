//! Strategy Labels: annotation splitting and normalization
//!
//! Annotations are free text such as `"assertive, logical and calm"`.
//! Each is split on commas, semicolons and the word "and", trimmed, and
//! title-cased word by word. Vocabulary extraction and per-record matching
//! both go through `split_strategies`, so a label picked from the vocabulary
//! always matches the records it came from.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::record::DialogueRecord;

/// Compiled delimiter pattern, shared by every caller
static DELIMITER_RE: OnceLock<Regex> = OnceLock::new();

fn delimiter_re() -> &'static Regex {
    // `,` + trailing space | `;` with optional spaces | whitespace-bounded "and"
    DELIMITER_RE.get_or_init(|| {
        Regex::new(r"(?i),\s*|\s*;\s*|\s+and\s+").expect("strategy delimiter pattern is valid")
    })
}

/// Title-case each whitespace-separated word ("shows EMPATHY" -> "Shows Empathy")
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            let Some(first) = chars.next() else {
                return String::new();
            };
            // Multi-char uppercase mappings (ß -> SS) would change on a second pass
            let mut upper = first.to_uppercase();
            let head = match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => first,
            };
            std::iter::once(head).chain(chars.flat_map(char::to_lowercase)).collect()
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Split one annotation into normalized labels, in order of appearance
pub fn split_strategies(annotation: &str) -> Vec<String> {
    delimiter_re()
        .split(annotation)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(normalize_label)
        .collect()
}

/// Union of every record's labels
pub fn extract_strategy_vocabulary(records: &[DialogueRecord]) -> BTreeSet<String> {
    records.iter().flat_map(DialogueRecord::strategies).collect()
}

/// DOM id for a label's checkbox ("Active Listening" -> "strategy-active-listening")
pub fn strategy_slug(label: &str) -> String {
    format!(
        "strategy-{}",
        label.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
    )
}
