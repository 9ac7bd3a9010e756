// src/feed/mod.rs
pub mod arxiv;
pub mod types;

/// Normalize feed text: decode HTML entities, fold newlines, collapse runs
/// of whitespace. arXiv wraps titles and abstracts with hard line breaks.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
