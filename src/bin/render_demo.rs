//! Demo that renders a small fake digest to stdout (no network, no webhook).

use chrono::Utc;

use arxiv_notifier::config::{DisplayConfig, TranslateConfig};
use arxiv_notifier::notify::blocks::render_digest;
use arxiv_notifier::notify::DigestEntry;
use arxiv_notifier::Record;

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let entries = vec![
        DigestEntry {
            record: Record {
                id: "2508.01234v1".into(),
                title: "Diffusion Models for X".into(),
                summary: "We study diffusion models for X and report strong results.".into(),
                link: "http://arxiv.org/abs/2508.01234v1".into(),
                published: "2025-08-15T03:59:00Z".into(),
                updated: "2025-08-15T04:00:00Z".into(),
            },
            matched: ["diffusion".to_string()].into_iter().collect(),
            translated: None,
        },
        DigestEntry {
            record: Record {
                id: "2508.05678v1".into(),
                title: "A GAN Revival".into(),
                summary: "GANs strike back.".into(),
                link: "http://arxiv.org/abs/2508.05678v1".into(),
                published: "2025-08-15T01:00:00Z".into(),
                updated: "2025-08-15T01:00:00Z".into(),
            },
            matched: ["gan".to_string()].into_iter().collect(),
            translated: None,
        },
    ];

    let display = DisplayConfig {
        show_keywords: true,
        show_abstract: true,
    };
    let rendered = render_digest(
        &entries,
        &display,
        &TranslateConfig::default(),
        Utc::now().date_naive(),
        5,
    );

    for block in &rendered.blocks {
        println!("[{}] {:?}", block.kind(), block);
    }
    println!("render-demo done ({} blocks)", rendered.blocks.len());
}
