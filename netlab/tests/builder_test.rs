//! Tests for profile builders and the classification helpers exported for
//! transport layers.

use std::net::Ipv4Addr;

use netlab::builders::{build_client_connection, build_hotspot_connection};
use netlab::{
    ConnectionSecret, EapConfig, HotspotAddressing, HotspotRequest, SecurityType, SignalRating,
    classify_security, frequency_to_channel, rate_signal,
};
use zvariant::Value;

#[test]
fn client_profiles_differ_by_secret() {
    let open = build_client_connection("Cafe", &ConnectionSecret::Open { confirmed: true });
    let psk = build_client_connection(
        "Home",
        &ConnectionSecret::Passphrase {
            psk: "password123".into(),
        },
    );
    let eap = build_client_connection(
        "Corp",
        &ConnectionSecret::Enterprise(
            EapConfig::new("alice", "pw").with_client_certificate("/etc/alice.pem"),
        ),
    );

    assert!(!open.contains_key("802-11-wireless-security"));
    assert!(psk.contains_key("802-11-wireless-security"));
    assert!(!psk.contains_key("802-1x"));
    assert_eq!(
        eap.get("802-1x").and_then(|s| s.get("client-cert")),
        Some(&Value::from("/etc/alice.pem".to_string()))
    );
}

#[test]
fn client_profile_is_named_after_ssid() {
    let settings = build_client_connection("Home", &ConnectionSecret::Open { confirmed: true });
    let conn = settings.get("connection").unwrap();
    assert_eq!(conn.get("id"), Some(&Value::from("Home".to_string())));
    assert_eq!(
        conn.get("type"),
        Some(&Value::from("802-11-wireless".to_string()))
    );
}

#[test]
fn hotspot_uses_custom_addressing() {
    let addressing = HotspotAddressing::new(Ipv4Addr::new(10, 42, 0, 1), 24);
    let settings = build_hotspot_connection(&HotspotRequest::new("lab", "password123"), &addressing);

    let ipv4 = settings.get("ipv4").unwrap();
    assert_eq!(ipv4.get("gateway"), Some(&Value::from("10.42.0.1".to_string())));
}

#[test]
fn exported_classifiers() {
    assert_eq!(classify_security(0, 0), SecurityType::Open);
    assert_eq!(frequency_to_channel(2437), 6);
    assert_eq!(frequency_to_channel(5180), 36);
    assert_eq!(frequency_to_channel(1000), 0);
    assert_eq!(rate_signal(-45), SignalRating::Excellent);
    assert_eq!(rate_signal(-65), SignalRating::Fair);
    assert_eq!(rate_signal(-95), SignalRating::None);
}
