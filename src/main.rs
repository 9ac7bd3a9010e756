//! arXiv keyword digest bot — binary entrypoint.
//! One invocation = one run: fetch, select, notify, persist seen ids.
//! Scheduling is external (cron / GitHub Actions); runs must not overlap.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use arxiv_notifier::config::Config;
use arxiv_notifier::feed::arxiv::{ArxivProvider, ARXIV_ATOM_URL};
use arxiv_notifier::notify::slack::SlackNotifier;
use arxiv_notifier::run::run_once;
use arxiv_notifier::translate::{GoogleTranslate, NoopTranslate, Translate};

#[derive(Debug, Parser)]
#[command(name = "arxiv-notifier", about = "Post new keyword-matched arXiv papers to Slack")]
struct Args {
    /// Path to the TOML config.
    #[arg(long, env = "CONFIG_PATH", default_value = "configs/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent (CI passes real env vars).
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let state_path = cfg.state_path(&args.config);

    let provider = ArxivProvider::from_url(
        ARXIV_ATOM_URL,
        cfg.categories.clone(),
        cfg.search.max_results,
    );
    let notifier = SlackNotifier::from_env(cfg.slack.clone());
    let translator: Box<dyn Translate> = if cfg.translate.enabled {
        Box::new(GoogleTranslate::from_env())
    } else {
        Box::new(NoopTranslate)
    };

    let summary = run_once(&cfg, &provider, &notifier, translator.as_ref(), &state_path).await?;
    tracing::info!(
        fetched = summary.fetched,
        posted = summary.posted,
        "arxiv-notifier finished"
    );
    Ok(())
}
