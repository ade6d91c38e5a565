// tests/mirror_env.rs
use trend_monitor::ingest::mirror::{MirrorRouter, WELL_KNOWN_HUB};

#[serial_test::serial]
#[test]
fn env_override_sets_the_primary() {
    std::env::set_var("RSSHUB_URL", "https://hub.internal.example.com");
    let router = MirrorRouter::from_env().unwrap();
    assert_eq!(
        router.primary().as_str(),
        "https://hub.internal.example.com/"
    );
    assert!(router.is_primary());
    std::env::remove_var("RSSHUB_URL");
}

#[serial_test::serial]
#[test]
fn absent_or_blank_env_falls_back_to_the_public_hub() {
    std::env::remove_var("RSSHUB_URL");
    let router = MirrorRouter::from_env().unwrap();
    assert_eq!(router.primary().host_str(), Some("rsshub.app"));

    std::env::set_var("RSSHUB_URL", "   ");
    let router = MirrorRouter::from_env().unwrap();
    assert_eq!(router.primary().as_str(), format!("{WELL_KNOWN_HUB}/"));
    std::env::remove_var("RSSHUB_URL");
}

#[serial_test::serial]
#[test]
fn unparsable_env_value_is_an_error() {
    std::env::set_var("RSSHUB_URL", "not a url");
    assert!(MirrorRouter::from_env().is_err());
    std::env::remove_var("RSSHUB_URL");
}
