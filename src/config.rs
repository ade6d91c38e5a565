// src/config.rs
//
// Run configuration: the source list (mandatory, TOML), keyword rules
// (optional, plain text), and env-first path resolution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::KeywordGroup;
use crate::ingest::types::Source;

pub const ENV_SOURCES_PATH: &str = "TREND_SOURCES_PATH";
pub const ENV_KEYWORDS_PATH: &str = "TREND_KEYWORDS_PATH";
pub const ENV_HISTORY_PATH: &str = "TREND_HISTORY_PATH";

pub const DEFAULT_SOURCES_PATH: &str = "config/sources.toml";
pub const DEFAULT_KEYWORDS_PATH: &str = "config/keywords.txt";
pub const DEFAULT_HISTORY_PATH: &str = "data/history.json";

fn path_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

pub fn sources_path() -> PathBuf {
    path_from_env(ENV_SOURCES_PATH, DEFAULT_SOURCES_PATH)
}

pub fn keywords_path() -> PathBuf {
    path_from_env(ENV_KEYWORDS_PATH, DEFAULT_KEYWORDS_PATH)
}

pub fn history_path() -> PathBuf {
    path_from_env(ENV_HISTORY_PATH, DEFAULT_HISTORY_PATH)
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(rename = "source", default)]
    sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    name: String,
    url: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Load the enabled sources. The source list is mandatory: any failure here
/// is fatal for the run.
pub fn load_sources(path: &Path) -> Result<Vec<Source>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    parse_sources(&content).with_context(|| format!("parsing sources from {}", path.display()))
}

fn parse_sources(content: &str) -> Result<Vec<Source>> {
    let file: SourcesFile = toml::from_str(content)?;
    Ok(file
        .sources
        .into_iter()
        .filter(|s| s.enabled)
        .map(|s| Source {
            name: s.name.trim().to_string(),
            url: s.url.trim().to_string(),
        })
        .collect())
}

/// Load keyword groups: one group per line, terms whitespace-separated,
/// `#` comments and blank lines skipped. The file is optional — missing or
/// unreadable means an empty rule set (match-all), logged, run continues.
pub fn load_keyword_groups(path: &Path) -> Vec<KeywordGroup> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::info!(path = %path.display(), error = %e, "no keywords file, matching everything");
            return Vec::new();
        }
    };
    parse_keyword_groups(&content)
}

fn parse_keyword_groups(content: &str) -> Vec<KeywordGroup> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(KeywordGroup::parse)
        .collect()
}
