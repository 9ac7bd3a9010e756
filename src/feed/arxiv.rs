// src/feed/arxiv.rs
//! arXiv Atom API provider. Queries export.arxiv.org with the configured
//! category list and parses the entry feed into `Record`s.

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::warn;

use crate::feed::normalize_text;
use crate::feed::types::{FeedProvider, Record};

pub const ARXIV_ATOM_URL: &str = "http://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    updated: Option<String>,
}

pub struct ArxivProvider {
    mode: Mode,
    categories: Vec<String>,
    max_results: usize,
}

enum Mode {
    // Owned copy so fixture-based tests need no 'static strings.
    Fixture(String),
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl ArxivProvider {
    pub fn from_url(url: impl Into<String>, categories: Vec<String>, max_results: usize) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
            categories,
            max_results,
        }
    }

    /// Parse a canned Atom document instead of hitting the network.
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
            categories: Vec::new(),
            max_results: 0,
        }
    }

    /// `cat:cs.CV OR cat:cs.LG` — categories OR-combined per the arXiv API.
    fn search_query(&self) -> String {
        self.categories
            .iter()
            .map(|c| format!("cat:{c}"))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn parse_records_from_str(s: &str) -> Result<Vec<Record>> {
        let feed: Feed = from_str(s).context("parsing arxiv atom xml")?;

        let mut out = Vec::with_capacity(feed.entries.len());
        for entry in feed.entries {
            // A malformed single entry is skipped; only a broken top-level
            // document fails the fetch.
            let (Some(link), Some(title), Some(published)) =
                (entry.id, entry.title, entry.published)
            else {
                warn!("skipping arxiv entry with missing id/title/published");
                continue;
            };
            let link = link.trim().to_string();
            // http://arxiv.org/abs/2508.01234v1 -> 2508.01234v1
            let Some(id) = link
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
            else {
                warn!(link = %link, "skipping arxiv entry with unusable id url");
                continue;
            };

            out.push(Record {
                id,
                title: normalize_text(&title),
                summary: normalize_text(entry.summary.as_deref().unwrap_or_default()),
                link,
                published: published.trim().to_string(),
                updated: entry.updated.unwrap_or_default().trim().to_string(),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl FeedProvider for ArxivProvider {
    async fn fetch_latest(&self) -> Result<Vec<Record>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_records_from_str(s),

            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .query(&[
                        ("search_query", self.search_query().as_str()),
                        ("start", "0"),
                        ("max_results", &self.max_results.to_string()),
                        ("sortBy", "submittedDate"),
                        ("sortOrder", "descending"),
                    ])
                    .timeout(std::time::Duration::from_secs(30))
                    .send()
                    .await
                    .context("arxiv http get")?
                    .error_for_status()
                    .context("arxiv non-2xx")?
                    .text()
                    .await
                    .context("arxiv http body")?;
                Self::parse_records_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "arXiv"
    }
}
