// src/patterns.rs
//! Keyword pattern compilation: raw keyword strings from config become
//! case-insensitive matchers usable by the scoring engine.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// A compiled matcher plus the raw keyword it came from (kept for display).
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    re: Regex,
}

impl Pattern {
    /// The keyword string as written in the config.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Count non-overlapping occurrences in `text`.
    pub fn count_matches(&self, text: &str) -> usize {
        self.re.find_iter(text).count()
    }
}

#[derive(Debug, Error)]
#[error("invalid keyword pattern `{keyword}`: {source}")]
pub struct PatternError {
    pub keyword: String,
    #[source]
    pub source: regex::Error,
}

/// Compile keywords in config order.
///
/// A keyword containing `|` is treated as a regex fragment so authors can
/// write explicit alternations ("gan|diffusion"); anything else is escaped
/// and matched as a literal substring. Both compile case-insensitively.
/// An empty list compiles to an empty vec, which downstream reads as
/// "keyword filtering disabled".
pub fn compile_keywords(keywords: &[String]) -> Result<Vec<Pattern>, PatternError> {
    let mut out = Vec::with_capacity(keywords.len());
    for kw in keywords {
        let expr = if kw.contains('|') {
            kw.clone()
        } else {
            regex::escape(kw)
        };
        let re = RegexBuilder::new(&expr)
            .case_insensitive(true)
            .build()
            .map_err(|e| PatternError {
                keyword: kw.clone(),
                source: e,
            })?;
        out.push(Pattern {
            raw: kw.clone(),
            re,
        });
    }
    Ok(out)
}
