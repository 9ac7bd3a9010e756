// src/config.rs
//! TOML configuration surface. Loaded once at startup into an immutable
//! value that is passed explicitly into the pipeline — no globals.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// arXiv category codes, OR-combined in the feed query.
    pub categories: Vec<String>,
    /// Raw keyword strings; an element containing `|` is a regex fragment.
    /// Empty list disables keyword filtering (pure recency selection).
    pub keywords: Vec<String>,
    /// Cap on records per notification.
    pub max_posts: usize,
    pub search: SearchConfig,
    pub display: DisplayConfig,
    pub translate: TranslateConfig,
    pub slack: SlackConfig,
    /// Seen-state filename; defaults to `data/seen_<config-stem>.json`.
    pub state_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: vec!["cs.CV".to_string()],
            keywords: Vec::new(),
            max_posts: 20,
            search: SearchConfig::default(),
            display: DisplayConfig::default(),
            translate: TranslateConfig::default(),
            slack: SlackConfig::default(),
            state_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Recency window in hours.
    pub hours_back: i64,
    /// Result cap requested from the feed.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hours_back: 24,
            max_results: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_keywords: bool,
    pub show_abstract: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_keywords: true,
            show_abstract: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub enabled: bool,
    pub show_translated: bool,
    pub hide_original_when_translated: bool,
    pub target_language: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            show_translated: false,
            hide_original_when_translated: false,
            target_language: "ja".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub username: String,
    pub icon_url: Option<String>,
    pub icon_emoji: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            username: "arXiv Bot".to_string(),
            icon_url: None,
            icon_emoji: ":newspaper:".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the seen-state path. Explicit `state_file` wins; otherwise
    /// derive `data/seen_<stem>.json` from the config filename, so separate
    /// configs (cv.toml, nlp.toml) keep separate seen sets.
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        if let Some(f) = &self.state_file {
            return PathBuf::from(f);
        }
        let stem = config_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("default");
        PathBuf::from("data").join(format!("seen_{stem}.json"))
    }
}
