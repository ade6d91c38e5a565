// src/ingest/parse.rs
//
// Format-tolerant feed decoding. Two dialects are accepted: RSS (items nested
// under a channel element, link as element text) and Atom (entries with the
// link carried in an href attribute). Both normalize into `FeedItem`.

use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::FeedItem;

/// Only the head of a feed is interesting for trend monitoring.
pub const MAX_ITEMS_PER_FEED: usize = 10;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Decode a feed body into normalized items. Never errors: malformed input
/// yields the empty vec.
///
/// Detection is "did decode succeed AND yield at least one item". A
/// well-formed RSS document with an empty channel therefore falls through to
/// the Atom attempt. That fallthrough is intended behavior, covered by tests;
/// do not "fix" it.
pub fn parse_feed(data: &[u8]) -> Vec<FeedItem> {
    let Ok(text) = std::str::from_utf8(data) else {
        return Vec::new();
    };

    if let Ok(rss) = from_str::<Rss>(text) {
        if !rss.channel.items.is_empty() {
            return rss
                .channel
                .items
                .into_iter()
                .take(MAX_ITEMS_PER_FEED)
                .filter_map(|it| normalize(it.title, it.link))
                .collect();
        }
    }

    if let Ok(atom) = from_str::<AtomFeed>(text) {
        if !atom.entries.is_empty() {
            return atom
                .entries
                .into_iter()
                .take(MAX_ITEMS_PER_FEED)
                .filter_map(|e| {
                    let href = e.links.into_iter().find_map(|l| l.href);
                    normalize(e.title, href)
                })
                .collect();
        }
    }

    Vec::new()
}

/// Title is trimmed then HTML-unescaped; entries whose title ends up empty are
/// dropped silently. Links are trimmed.
fn normalize(title: Option<String>, link: Option<String>) -> Option<FeedItem> {
    let title = html_escape::decode_html_entities(title.as_deref().unwrap_or_default().trim())
        .into_owned();
    if title.is_empty() {
        return None;
    }
    Some(FeedItem {
        title,
        url: link.as_deref().unwrap_or_default().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rss_titles_are_unescaped_and_trimmed() {
        let xml = r#"<rss version="2.0"><channel>
            <item><title>  Rust 1.80 &amp; beyond </title><link> https://example.com/a </link></item>
        </channel></rss>"#;
        let items = parse_feed(xml.as_bytes());
        assert_eq!(
            items,
            vec![FeedItem {
                title: "Rust 1.80 & beyond".into(),
                url: "https://example.com/a".into(),
            }]
        );
    }

    #[test]
    fn empty_titles_are_dropped() {
        let xml = r#"<rss version="2.0"><channel>
            <item><title>   </title><link>https://example.com/a</link></item>
            <item><title>kept</title><link>https://example.com/b</link></item>
        </channel></rss>"#;
        let items = parse_feed(xml.as_bytes());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
    }

    #[test]
    fn garbage_yields_empty() {
        assert!(parse_feed(b"not xml at all").is_empty());
        assert!(parse_feed(&[0xff, 0xfe, 0x00]).is_empty());
    }
}
