// tests/e2e_digest.rs
// End-to-end run against a canned Atom feed: fixture provider, capturing
// notifier, real seen-state file.

use std::sync::Mutex;

use anyhow::Result;
use chrono::{Duration, Utc};

use arxiv_notifier::config::Config;
use arxiv_notifier::feed::arxiv::ArxivProvider;
use arxiv_notifier::feed::types::FeedProvider;
use arxiv_notifier::notify::{Block, Notifier, Rendered};
use arxiv_notifier::run::run_once;
use arxiv_notifier::seen::SeenSet;
use arxiv_notifier::select::select;
use arxiv_notifier::translate::NoopTranslate;

/// Notifier that records what it was asked to send.
#[derive(Default)]
struct CapturingNotifier {
    sent: Mutex<Vec<Rendered>>,
    fail: bool,
}

#[async_trait::async_trait]
impl Notifier for CapturingNotifier {
    async fn send(&self, rendered: &Rendered) -> Result<()> {
        if self.fail {
            anyhow::bail!("sink unavailable");
        }
        self.sent.lock().unwrap().push(rendered.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "capture"
    }
}

fn entry_xml(id: &str, title: &str, summary: &str, published: chrono::DateTime<Utc>) -> String {
    let ts = published.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    format!(
        "<entry><id>http://arxiv.org/abs/{id}</id><updated>{ts}</updated>\
         <published>{ts}</published><title>{title}</title><summary>{summary}</summary></entry>"
    )
}

/// Three entries: one fresh diffusion paper, one outside the 24h window,
/// one fresh but already notified.
fn fixture_feed() -> String {
    let now = Utc::now();
    let entries = [
        entry_xml(
            "2508.00001v1",
            "Diffusion Models for X",
            "A new approach.",
            now - Duration::hours(2),
        ),
        entry_xml(
            "2508.00002v1",
            "Diffusion Too Old",
            "Stale diffusion paper.",
            now - Duration::hours(30),
        ),
        entry_xml(
            "2508.00003v1",
            "Diffusion Already Seen",
            "Previously notified.",
            now - Duration::hours(1),
        ),
    ];
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <feed xmlns=\"http://www.w3.org/2005/Atom\">{}</feed>",
        entries.join("")
    )
}

fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.keywords = vec!["diffusion".to_string()];
    cfg.max_posts = 20;
    cfg.search.hours_back = 24;
    cfg
}

#[tokio::test]
async fn selects_exactly_the_fresh_unseen_match() {
    let provider = ArxivProvider::from_fixture_str(&fixture_feed());
    let records = provider.fetch_latest().await.unwrap();
    assert_eq!(records.len(), 3);

    let patterns = arxiv_notifier::compile_keywords(&["diffusion".to_string()]).unwrap();
    let mut seen = SeenSet::default();
    seen.mark_seen(["2508.00003v1"]);

    let selection = select(records, &patterns, &seen, Utc::now(), 24, 20);
    assert_eq!(selection.entries.len(), 1);
    let sel = &selection.entries[0];
    assert_eq!(sel.record.id, "2508.00001v1");
    // "diffusion" once in the title, nowhere in the summary: 1*2 + 0.
    assert_eq!(sel.score, 2);
    assert_eq!(
        sel.matched.iter().collect::<Vec<_>>(),
        vec![&"diffusion".to_string()]
    );
}

#[tokio::test]
async fn full_run_posts_digest_and_persists_seen_ids() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    std::fs::write(&state_path, r#"["2508.00003v1"]"#).unwrap();
    let cfg = test_config();

    let provider = ArxivProvider::from_fixture_str(&fixture_feed());
    let notifier = CapturingNotifier::default();

    let summary = run_once(&cfg, &provider, &notifier, &NoopTranslate, &state_path)
        .await
        .unwrap();
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.posted, 1);

    // Digest went out with the expected record in it.
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .blocks
        .iter()
        .any(|b| matches!(b, Block::Section(t) if t.contains("Diffusion Models for X"))));

    // Seen state was written after the successful delivery.
    let seen = SeenSet::load(&state_path);
    assert!(seen.contains("2508.00001v1"));
    assert!(!seen.contains("2508.00002v1"));
}

#[tokio::test]
async fn second_run_over_same_feed_posts_empty_notice() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    std::fs::write(&state_path, r#"["2508.00003v1"]"#).unwrap();
    let cfg = test_config();
    let feed = fixture_feed();

    let first = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&feed),
        &CapturingNotifier::default(),
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap();
    assert_eq!(first.posted, 1);

    let notifier = CapturingNotifier::default();
    let second = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&feed),
        &notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap();
    assert_eq!(second.posted, 0);

    // The rerun delivers the "no new matches" notice, not a digest.
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .blocks
        .iter()
        .any(|b| matches!(b, Block::Header(t) if t.contains("No new arXiv matches"))));
}

#[tokio::test]
async fn max_posts_zero_still_reports_eligible_count() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    let mut cfg = test_config();
    cfg.max_posts = 0;

    let notifier = CapturingNotifier::default();
    let summary = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&fixture_feed()),
        &notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap();

    // The fresh match was eligible even though the cap kept it out of the
    // digest; the summary must say so, and nothing gets marked seen.
    assert_eq!(summary.posted, 0);
    assert_eq!(summary.eligible, 1);
    assert!(!state_path.exists());
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .blocks
        .iter()
        .any(|b| matches!(b, Block::Header(t) if t.contains("No new arXiv matches"))));
}

#[tokio::test]
async fn sink_failure_leaves_seen_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    let cfg = test_config();

    let notifier = CapturingNotifier {
        fail: true,
        ..CapturingNotifier::default()
    };
    let err = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&fixture_feed()),
        &notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("capture"));

    // No delivery commitment, so the record stays eligible next run.
    assert!(!state_path.exists());
    let retry_notifier = CapturingNotifier::default();
    let retry = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&fixture_feed()),
        &retry_notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap();
    assert_eq!(retry.posted, 1);
}

#[tokio::test]
async fn corrupt_seen_file_recovers_as_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    std::fs::write(&state_path, "not json at all {{{").unwrap();

    let cfg = test_config();
    let notifier = CapturingNotifier::default();
    let summary = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&fixture_feed()),
        &notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap();

    // Corruption means "no prior state": the fresh match is posted and the
    // file is rewritten as a clean sorted array.
    assert_eq!(summary.posted, 1);
    let reloaded: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(reloaded, vec!["2508.00001v1".to_string()]);
}

#[tokio::test]
async fn bad_keyword_pattern_fails_before_any_io() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("seen_test.json");
    let mut cfg = test_config();
    cfg.keywords = vec!["broken|(".to_string()];

    let notifier = CapturingNotifier::default();
    let err = run_once(
        &cfg,
        &ArxivProvider::from_fixture_str(&fixture_feed()),
        &notifier,
        &NoopTranslate,
        &state_path,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("broken|("));
    assert!(notifier.sent.lock().unwrap().is_empty());
}
