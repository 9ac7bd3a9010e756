// src/feed/types.rs
use anyhow::Result;

/// One upstream paper record. Timestamps stay as the raw RFC 3339 strings
/// the feed delivered; parsing happens downstream so a single bad timestamp
/// never aborts a fetch.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String, // e.g. "2508.01234" (last path segment of the abs URL)
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published: String, // RFC 3339, UTC
    pub updated: String,   // RFC 3339, UTC
}

#[async_trait::async_trait]
pub trait FeedProvider {
    async fn fetch_latest(&self) -> Result<Vec<Record>>;
    fn name(&self) -> &'static str;
}
