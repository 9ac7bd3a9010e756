// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod feed;
pub mod notify;
pub mod patterns;
pub mod run;
pub mod scoring;
pub mod seen;
pub mod select;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::feed::types::{FeedProvider, Record};
pub use crate::notify::{Block, DigestEntry, Notifier, Rendered};
pub use crate::patterns::{compile_keywords, Pattern, PatternError};
pub use crate::run::{run_once, RunSummary};
pub use crate::scoring::MatchScore;
pub use crate::seen::SeenSet;
pub use crate::select::{Selected, Selection};
