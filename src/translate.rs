// src/translate.rs
//! Best-effort text translation. The pipeline treats any failure here as
//! "no translation": the caller omits the block and keeps the original
//! abstract, so this collaborator is never on the fatal path.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const ENV_API_KEY: &str = "GOOGLE_TRANSLATE_API_KEY";
const GOOGLE_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[async_trait::async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Identity transform; used when translation is disabled.
pub struct NoopTranslate;

#[async_trait::async_trait]
impl Translate for NoopTranslate {
    async fn translate(&self, text: &str, _target_language: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Google Cloud Translation v2 REST client (API-key auth).
pub struct GoogleTranslate {
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl GoogleTranslate {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY).ok(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Translate for GoogleTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let Some(key) = &self.api_key else {
            bail!("{ENV_API_KEY} is not set");
        };

        let resp: TranslateResponse = self
            .client
            .post(GOOGLE_TRANSLATE_URL)
            .query(&[("key", key.as_str())])
            .json(&serde_json::json!({
                "q": text,
                "target": target_language,
                "format": "text",
            }))
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .context("translate post")?
            .error_for_status()
            .context("translate non-2xx")?
            .json()
            .await
            .context("translate response body")?;

        let Some(first) = resp.data.translations.into_iter().next() else {
            bail!("translate response carried no translations");
        };
        // v2 returns HTML entities even for format=text in some locales.
        Ok(html_escape::decode_html_entities(&first.translated_text).into_owned())
    }
}
