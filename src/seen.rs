// src/seen.rs
//! Durable set of already-notified record ids. Stored as a JSON array of
//! strings; fully rewritten on every successful run.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<String>,
}

impl SeenSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn mark_seen<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Load from `path`. A missing file means "no prior state"; an
    /// unreadable or unparseable file is logged and also treated as empty,
    /// never as a fatal error — it gets rewritten at the next persist.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "seen file unreadable, starting empty");
                return Self::default();
            }
        };
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(ids) => Self {
                ids: ids.into_iter().collect(),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "seen file corrupt, starting empty");
                Self::default()
            }
        }
    }

    /// Full overwrite with the lexicographically sorted id list.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating state dir {}", dir.display()))?;
            }
        }
        let ids: Vec<&String> = self.ids.iter().collect();
        let json = serde_json::to_string(&ids).context("serializing seen set")?;
        fs::write(path, json).with_context(|| format!("writing seen file {}", path.display()))
    }
}
