// src/notify/blocks.rs
//! Digest rendering into typed Slack-shaped blocks, with per-block
//! validation. Invalid blocks are dropped and reported as diagnostics;
//! rendering itself never fails the run.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::config::{DisplayConfig, TranslateConfig};
use crate::feed::types::Record;

/// Slack Block Kit ceilings: header plain_text 150 chars, section/context
/// mrkdwn 3000 chars.
pub const HEADER_TEXT_MAX: usize = 150;
pub const SECTION_TEXT_MAX: usize = 3000;
/// Display cap for abstracts, so one verbose paper can't flood the digest.
pub const ABSTRACT_PREVIEW_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(String),
    Section(String),
    Context(String),
    Divider,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("empty {0} block")]
    Empty(&'static str),
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header(_) => "header",
            Block::Section(_) => "section",
            Block::Context(_) => "context",
            Block::Divider => "divider",
        }
    }

    pub fn text_chars(&self) -> usize {
        match self {
            Block::Header(t) | Block::Section(t) | Block::Context(t) => t.chars().count(),
            Block::Divider => 0,
        }
    }

    /// Enforce structural constraints: text blocks must be non-empty and
    /// within the sink ceiling. Over-limit text is truncated with an
    /// ellipsis marker rather than rejected.
    fn validate(self) -> Result<Block, BlockError> {
        match self {
            Block::Divider => Ok(Block::Divider),
            Block::Header(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(BlockError::Empty("header"));
                }
                Ok(Block::Header(truncate_chars(&t, HEADER_TEXT_MAX)))
            }
            Block::Section(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(BlockError::Empty("section"));
                }
                Ok(Block::Section(truncate_chars(&t, SECTION_TEXT_MAX)))
            }
            Block::Context(t) => {
                let t = t.trim().to_string();
                if t.is_empty() {
                    return Err(BlockError::Empty("context"));
                }
                Ok(Block::Context(truncate_chars(&t, SECTION_TEXT_MAX)))
            }
        }
    }
}

/// Truncate to `max` chars, marking the cut with `...`. The output never
/// exceeds `max`, even for budgets smaller than the marker itself.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.extend(std::iter::repeat('.').take(max - keep));
    out
}

/// Accepted blocks plus diagnostics for everything that was dropped.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub blocks: Vec<Block>,
    pub dropped: Vec<String>,
}

/// One selected record as the renderer sees it: matched keywords and an
/// already-attempted translation (the caller owns the fallback decision,
/// `None` means disabled or failed and the block is simply omitted).
#[derive(Debug, Clone)]
pub struct DigestEntry {
    pub record: Record,
    pub matched: BTreeSet<String>,
    pub translated: Option<String>,
}

/// Render the digest for a non-empty selection.
///
/// `eligible` is the pre-truncation candidate count; when it exceeds the
/// rendered count the header shows both numbers.
pub fn render_digest(
    entries: &[DigestEntry],
    display: &DisplayConfig,
    translate: &TranslateConfig,
    run_date: NaiveDate,
    eligible: usize,
) -> Rendered {
    let mut raw = Vec::with_capacity(entries.len() * 5 + 1);

    let mut header = format!("New arXiv papers ({run_date})");
    if eligible > entries.len() {
        header.push_str(&format!(" — top {} of {}", entries.len(), eligible));
    }
    raw.push(Block::Header(header));

    for entry in entries {
        let r = &entry.record;
        raw.push(Block::Section(format!("*<{}|{}>*", r.link, r.title)));

        if display.show_keywords && !entry.matched.is_empty() {
            // Strip regex escapes so "c\+\+" displays as "c++".
            let shown: Vec<String> = entry
                .matched
                .iter()
                .map(|kw| kw.replace('\\', ""))
                .collect();
            raw.push(Block::Section(format!("*Keywords:* {}", shown.join(", "))));
        }

        let translated = translate
            .show_translated
            .then_some(entry.translated.as_deref())
            .flatten();

        let hide_original = translate.hide_original_when_translated && translated.is_some();
        if display.show_abstract && !hide_original {
            raw.push(Block::Section(format!(
                "*Abstract:* {}",
                truncate_chars(&r.summary, ABSTRACT_PREVIEW_MAX)
            )));
        }
        if let Some(t) = translated {
            raw.push(Block::Section(format!(
                "*Translation:* {}",
                truncate_chars(t, ABSTRACT_PREVIEW_MAX)
            )));
        }

        raw.push(Block::Context(format!(
            "`{}`  •  published: {}",
            r.id, r.published
        )));
        raw.push(Block::Divider);
    }

    finish(raw)
}

/// Render the "nothing to notify" notice, embedding the active search
/// parameters so operators can see what the run looked for.
pub fn render_empty(
    categories: &[String],
    keywords: &[String],
    hours_back: i64,
    run_date: NaiveDate,
) -> Rendered {
    let raw = vec![
        Block::Header(format!("No new arXiv matches ({run_date})")),
        Block::Context(format!(
            "categories: {}  •  keywords: {}  •  window: {}h",
            categories.join(", "),
            if keywords.is_empty() {
                "(none)".to_string()
            } else {
                keywords.join(", ")
            },
            hours_back
        )),
    ];
    finish(raw)
}

/// Validate each block; collect drop diagnostics. If nothing survives,
/// fall back to a minimal notice so the run still delivers something.
fn finish(raw: Vec<Block>) -> Rendered {
    let mut out = Rendered::default();
    for (i, block) in raw.into_iter().enumerate() {
        let kind = block.kind();
        match block.validate() {
            Ok(b) => out.blocks.push(b),
            Err(e) => {
                warn!(index = i, kind, error = %e, "dropping invalid block");
                out.dropped.push(format!("block {i} ({kind}): {e}"));
            }
        }
    }
    if out.blocks.is_empty() {
        out.blocks.push(Block::Section(
            "arXiv digest could not be rendered; see bot logs.".to_string(),
        ));
    }
    out
}
