// tests/dedup_stage.rs
use std::collections::HashSet;

use trend_monitor::filter::{select_new_items, KeywordGroup};
use trend_monitor::{FeedItem, HistoryStore, RunResult};

fn item(title: &str, url: &str) -> FeedItem {
    FeedItem {
        title: title.into(),
        url: url.into(),
    }
}

fn run_with(items: Vec<FeedItem>) -> RunResult {
    let mut result = RunResult::default();
    result.per_source.insert("feed".into(), items);
    result.success_count = 1;
    result
}

#[test]
fn dedup_is_against_history_only() {
    // Intra-run duplicates are not collapsed; only the history set suppresses
    // items. Confirmed design choice.
    let history: HashSet<String> = ["https://a/1".to_string()].into_iter().collect();
    let result = run_with(vec![
        item("one", "https://a/1"),
        item("two", "https://a/2"),
        item("two again", "https://a/2"),
    ]);

    let new_items = select_new_items(&result, &[], &history);

    assert_eq!(new_items.len(), 2);
    assert!(new_items.iter().all(|i| i.url == "https://a/2"));
}

#[test]
fn keyword_rules_and_history_combine() {
    let history: HashSet<String> = ["https://a/rust-old".to_string()].into_iter().collect();
    let groups = vec![KeywordGroup::parse("+rust !rumor").unwrap()];
    let result = run_with(vec![
        item("Rust 1.80 released", "https://a/rust-new"),
        item("Rust rumor mill", "https://a/rust-gossip"),
        item("Rust 1.79 recap", "https://a/rust-old"),
        item("Go 1.23 released", "https://a/go"),
    ]);

    let new_items = select_new_items(&result, &groups, &history);

    assert_eq!(new_items.len(), 1);
    assert_eq!(new_items[0].url, "https://a/rust-new");
}

#[test]
fn second_run_with_updated_history_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("history.json"));
    let result = run_with(vec![
        item("alpha", "https://a/1"),
        item("beta", "https://a/2"),
    ]);

    // Run 1: everything is new; deliver and persist.
    let known = store.load_urls();
    let run1 = select_new_items(&result, &[], &known);
    assert_eq!(run1.len(), 2);
    store.append(&run1, &known).unwrap();

    // Run 2: unchanged upstream content, refreshed history.
    let known = store.load_urls();
    let run2 = select_new_items(&result, &[], &known);
    assert!(run2.is_empty());
}
