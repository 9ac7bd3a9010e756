// src/notify/mod.rs
pub mod blocks;
pub mod slack;

use anyhow::Result;

pub use blocks::{Block, DigestEntry, Rendered};

#[async_trait::async_trait]
pub trait Notifier {
    async fn send(&self, rendered: &Rendered) -> Result<()>;
    fn name(&self) -> &'static str;
}
