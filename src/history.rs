//! history.rs — bounded append log of previously delivered items, persisted as
//! a JSON array. Membership is keyed by URL only; title and timestamp are
//! carried for diagnostics.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::types::FeedItem;

/// At-rest cap; oldest records are trimmed first on overflow.
pub const HISTORY_CAP: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub title: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    cap: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cap: HISTORY_CAP,
        }
    }

    pub fn with_capacity(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// URL set for dedup. A missing or unreadable log is an empty set, not an
    /// error: first runs start from nothing.
    pub fn load_urls(&self) -> HashSet<String> {
        self.read_records()
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    /// Append records for items not already in `known`, then trim to the cap.
    /// Read-modify-write: the on-disk state is re-read first, so this assumes
    /// a single writer.
    pub fn append(&self, delivered: &[FeedItem], known: &HashSet<String>) -> Result<()> {
        let mut records = self.read_records();
        let now = Utc::now();

        for item in delivered {
            if known.contains(&item.url) {
                continue;
            }
            records.push(HistoryRecord {
                title: item.title.clone(),
                url: item.url.clone(),
                timestamp: now,
            });
        }

        if records.len() > self.cap {
            let excess = records.len() - self.cap;
            records.drain(0..excess);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating history dir {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(&records).context("serializing history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing history to {}", self.path.display()))?;
        Ok(())
    }

    fn read_records(&self) -> Vec<HistoryRecord> {
        let Ok(data) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history file unreadable, starting empty");
                Vec::new()
            }
        }
    }
}
