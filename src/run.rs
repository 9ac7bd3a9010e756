// src/run.rs
//! One full pipeline execution: fetch → select → render → deliver → persist.
//! Seen ids are committed only after the sink accepted a non-empty digest,
//! so a delivery failure leaves the records eligible for the next run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::feed::types::FeedProvider;
use crate::notify::{blocks, DigestEntry, Notifier};
use crate::seen::SeenSet;
use crate::select;
use crate::translate::Translate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub eligible: usize,
    pub posted: usize,
}

pub async fn run_once(
    cfg: &Config,
    provider: &dyn FeedProvider,
    notifier: &dyn Notifier,
    translator: &dyn Translate,
    state_path: &Path,
) -> Result<RunSummary> {
    // Configuration errors are fatal before any I/O happens.
    let patterns = crate::patterns::compile_keywords(&cfg.keywords)?;

    let mut seen = SeenSet::load(state_path);
    info!(
        provider = provider.name(),
        categories = ?cfg.categories,
        keywords = cfg.keywords.len(),
        seen = seen.len(),
        "fetching feed"
    );

    let records = provider
        .fetch_latest()
        .await
        .with_context(|| format!("fetching from {}", provider.name()))?;
    let fetched = records.len();

    let now = Utc::now();
    let selection = select::select(
        records,
        &patterns,
        &seen,
        now,
        cfg.search.hours_back,
        cfg.max_posts,
    );

    if selection.is_empty() {
        // eligible can be non-zero here (max_posts = 0 truncates everything).
        info!(fetched, eligible = selection.eligible, "no new items matched");
        let rendered = blocks::render_empty(
            &cfg.categories,
            &cfg.keywords,
            cfg.search.hours_back,
            now.date_naive(),
        );
        notifier
            .send(&rendered)
            .await
            .with_context(|| format!("delivering empty notice via {}", notifier.name()))?;
        return Ok(RunSummary {
            fetched,
            eligible: selection.eligible,
            posted: 0,
        });
    }

    // Translation is attempted up front so the renderer stays pure; a
    // failure just leaves the entry without a translated block.
    let want_translation = cfg.translate.enabled && cfg.translate.show_translated;
    let mut entries = Vec::with_capacity(selection.entries.len());
    for sel in &selection.entries {
        let translated = if want_translation {
            match translator
                .translate(&sel.record.summary, &cfg.translate.target_language)
                .await
            {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!(id = %sel.record.id, error = %e, "translation failed, omitting block");
                    None
                }
            }
        } else {
            None
        };
        entries.push(DigestEntry {
            record: sel.record.clone(),
            matched: sel.matched.clone(),
            translated,
        });
    }

    let rendered = blocks::render_digest(
        &entries,
        &cfg.display,
        &cfg.translate,
        now.date_naive(),
        selection.eligible,
    );
    if !rendered.dropped.is_empty() {
        warn!(dropped = ?rendered.dropped, "some blocks failed validation");
    }

    notifier
        .send(&rendered)
        .await
        .with_context(|| format!("delivering digest via {}", notifier.name()))?;

    seen.mark_seen(entries.iter().map(|e| e.record.id.clone()));
    seen.persist(state_path)
        .context("persisting seen state after successful delivery")?;

    let posted = entries.len();
    info!(fetched, eligible = selection.eligible, posted, "run complete");
    Ok(RunSummary {
        fetched,
        eligible: selection.eligible,
        posted,
    })
}
