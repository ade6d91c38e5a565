// src/filter.rs
//
// Keyword rules and the pure filter/dedup stage. A rule set is an ordered
// sequence of groups (OR branches); each group is an AND/NOT combination of
// term matches over the lowercased title.

use std::collections::HashSet;

use crate::ingest::types::{FeedItem, RunResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Matches if the term is a substring; any plain hit marks the group.
    Plain,
    /// `+term`: must be a substring, otherwise the group is disqualified.
    Require,
    /// `!term`: must NOT be a substring, otherwise the group is disqualified.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,
    /// Stored lowercased; matching is case-insensitive substring.
    pub text: String,
}

impl Term {
    pub fn parse(word: &str) -> Self {
        let (kind, text) = match word.strip_prefix('!') {
            Some(rest) => (TermKind::Exclude, rest),
            None => match word.strip_prefix('+') {
                Some(rest) => (TermKind::Require, rest),
                None => (TermKind::Plain, word),
            },
        };
        Self {
            kind,
            text: text.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordGroup {
    pub terms: Vec<Term>,
}

impl KeywordGroup {
    /// One group per line, terms whitespace-separated. Empty lines yield no
    /// group.
    pub fn parse(line: &str) -> Option<Self> {
        let terms: Vec<Term> = line.split_whitespace().map(Term::parse).collect();
        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    /// Terms are evaluated in order. An exclude hit disqualifies immediately;
    /// a require miss disqualifies immediately; a require or plain hit marks
    /// the group matched but evaluation continues, so a later term can still
    /// flip the group to excluded.
    fn matches(&self, title_lower: &str) -> bool {
        let mut matched = false;
        let mut excluded = false;

        for term in &self.terms {
            match term.kind {
                TermKind::Exclude => {
                    if title_lower.contains(&term.text) {
                        excluded = true;
                        break;
                    }
                }
                TermKind::Require => {
                    if !title_lower.contains(&term.text) {
                        matched = false;
                        break;
                    }
                    matched = true;
                }
                TermKind::Plain => {
                    if title_lower.contains(&term.text) {
                        matched = true;
                    }
                }
            }
        }

        matched && !excluded
    }
}

/// A title matches iff ANY group passes. No groups at all means everything
/// matches.
pub fn title_matches(title: &str, groups: &[KeywordGroup]) -> bool {
    if groups.is_empty() {
        return true;
    }
    let title_lower = title.to_lowercase();
    groups.iter().any(|g| g.matches(&title_lower))
}

/// Keep every fetched item whose title passes the rule set and whose URL is
/// absent from history. Pure given its inputs. Dedup is against persisted
/// history only; duplicates within one run's fetched set all survive — a
/// confirmed design choice, not an oversight.
pub fn select_new_items(
    results: &RunResult,
    groups: &[KeywordGroup],
    history_urls: &HashSet<String>,
) -> Vec<FeedItem> {
    let mut out = Vec::new();
    for items in results.per_source.values() {
        for item in items {
            if !title_matches(&item.title, groups) {
                continue;
            }
            if history_urls.contains(&item.url) {
                continue;
            }
            out.push(item.clone());
        }
    }
    out
}
