//! Title cleanup ahead of query generation.

use flipwatch_core::NormalizedProduct;
use regex::Regex;
use std::sync::LazyLock;

/// Alert boilerplate that never belongs in a product name.
const NOISE_TOKENS: &[&str] = &[
    "back in stock",
    "in stock",
    "restock",
    "price drop",
    "deal alert",
    "free delivery",
    "free shipping",
];

static URLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Square-bracketed tags like "[TEST]" or "[RESTOCK]".
static BRACKET_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Embedded currency amounts in either order: "£45", "USD 12", "45.00 GBP".
static CURRENCY_AMOUNTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[£$€]|\b(?:GBP|USD|EUR)\b)\s*\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s*(?:GBP|USD|EUR)\b")
        .unwrap()
});

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = NOISE_TOKENS
        .iter()
        .map(|token| regex::escape(token).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

/// Clean a raw alert title into a searchable product name.
///
/// Idempotent: cleaning an already-clean name changes nothing.
pub fn normalize(raw: &str) -> String {
    let text = URLS.replace_all(raw, " ");
    let text = BRACKET_TAGS.replace_all(&text, " ");
    // Dash variants fold to spaces before token removal so hyphenated
    // boilerplate ("in-stock") is caught in the same pass.
    let text: String = text
        .chars()
        .map(|c| if matches!(c, '-' | '–' | '—') { ' ' } else { c })
        .collect();
    let text = CURRENCY_AMOUNTS.replace_all(&text, " ");
    let text = NOISE.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a title, keeping the raw form alongside the cleaned name.
pub fn normalize_product(raw_title: &str) -> NormalizedProduct {
    NormalizedProduct::new(normalize(raw_title), raw_title)
}
