// src/scoring.rs
//! Relevance scoring: occurrence-weighted keyword matching over a record's
//! title and summary. Pure functions, no I/O.

use std::collections::BTreeSet;

use crate::patterns::Pattern;

/// Score plus the raw keyword strings that matched.
///
/// `matched` is a `BTreeSet` so downstream rendering is deterministic
/// regardless of pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub score: u32,
    pub matched: BTreeSet<String>,
}

/// Compute the relevance score for one record.
///
/// Every non-overlapping occurrence in the title counts 2, in the summary 1,
/// summed across all patterns. A pattern that hits either field contributes
/// its raw keyword to `matched` once.
///
/// An empty pattern list returns `(0, {})` — the sentinel for "no keyword
/// filtering configured". Callers must not reject on score 0 in that case.
pub fn score(title: &str, summary: &str, patterns: &[Pattern]) -> MatchScore {
    let mut out = MatchScore::default();
    if patterns.is_empty() {
        return out;
    }

    let mut title_hits = 0usize;
    let mut summary_hits = 0usize;
    for pat in patterns {
        let t = pat.count_matches(title);
        let s = pat.count_matches(summary);
        if t > 0 || s > 0 {
            out.matched.insert(pat.raw().to_string());
        }
        title_hits += t;
        summary_hits += s;
    }

    out.score = (title_hits as u32) * 2 + (summary_hits as u32);
    out
}
