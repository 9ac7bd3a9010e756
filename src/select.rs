// src/select.rs
//! Recency window filter and the selection pipeline: dedup against the seen
//! set, score, rank, truncate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::feed::types::Record;
use crate::patterns::Pattern;
use crate::scoring;
use crate::seen::SeenSet;

/// Parse a feed timestamp. Returns `None` on anything malformed.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// True iff `published` is at most `hours_back` hours before `now`.
/// Future-dated records (feed clock skew) count as within the window.
pub fn is_within_window(published: DateTime<Utc>, now: DateTime<Utc>, hours_back: i64) -> bool {
    (now - published).num_seconds() <= hours_back * 3600
}

/// One record that survived selection, with the keywords that matched it.
#[derive(Debug, Clone)]
pub struct Selected {
    pub record: Record,
    pub score: u32,
    pub matched: BTreeSet<String>,
}

/// Selection output: the ranked, truncated entries plus the pre-truncation
/// candidate count (the renderer shows both when they differ).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub entries: Vec<Selected>,
    pub eligible: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run the selection pipeline over a fetched batch.
///
/// Rejects records already in `seen`, records outside the recency window,
/// records with unparseable timestamps (fails closed), and — when patterns
/// are configured — records scoring zero. With an empty pattern list every
/// surviving record is retained at score 0, so selection degrades to pure
/// recency ordering (intended behavior for keyword-free configs).
///
/// Ranking is score descending, then published descending; the sort is
/// stable, so identical inputs always produce identical output.
pub fn select(
    records: Vec<Record>,
    patterns: &[Pattern],
    seen: &SeenSet,
    now: DateTime<Utc>,
    hours_back: i64,
    max_posts: usize,
) -> Selection {
    let mut candidates: Vec<(u32, DateTime<Utc>, Selected)> = Vec::new();

    for record in records {
        if seen.contains(&record.id) {
            debug!(id = %record.id, "skip: already notified");
            continue;
        }
        let Some(published) = parse_published(&record.published) else {
            debug!(id = %record.id, raw = %record.published, "skip: unparseable timestamp");
            continue;
        };
        if !is_within_window(published, now, hours_back) {
            continue;
        }

        let hit = scoring::score(&record.title, &record.summary, patterns);
        if !patterns.is_empty() && hit.score == 0 {
            continue;
        }

        candidates.push((
            hit.score,
            published,
            Selected {
                record,
                score: hit.score,
                matched: hit.matched,
            },
        ));
    }

    // Score desc, then published desc; stable for full ties.
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let eligible = candidates.len();
    let entries = candidates
        .into_iter()
        .take(max_posts)
        .map(|(_, _, sel)| sel)
        .collect();

    Selection { entries, eligible }
}
