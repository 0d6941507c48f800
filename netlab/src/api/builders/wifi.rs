//! Profiles for the two WiFi workflows.
//!
//! A connection is represented as a nested dictionary:
//! - `connection`: General settings (type, id, uuid, autoconnect)
//! - `802-11-wireless`: Wi-Fi specific settings (ssid, mode, security reference)
//! - `802-11-wireless-security`: Security settings (key-mgmt, psk)
//! - `802-1x`: Enterprise authentication settings (for WPA-EAP)
//! - `ipv4` / `ipv6`: IP configuration

use super::ConnectionProfile;
use super::connection_builder::IpConfig;
use super::wifi_builder::{Pmf, WifiBand, WifiConnectionBuilder, WifiMode};
use crate::api::config::HotspotAddressing;
use crate::api::models::{ConnectionSecret, HotspotRequest};

/// Builds the infrastructure-mode profile used to join a network.
///
/// # Sections Created
///
/// - `connection`, `802-11-wireless`, `ipv4` / `ipv6` (auto): always
/// - `802-11-wireless-security`: passphrase and enterprise secrets
/// - `802-1x`: enterprise secrets only
pub fn build_client_connection(ssid: &str, secret: &ConnectionSecret) -> ConnectionProfile {
    let builder = WifiConnectionBuilder::new(ssid)
        .mode(WifiMode::Infrastructure)
        .connection(|c| c.ipv4_auto().ipv6_auto());

    let builder = match secret {
        ConnectionSecret::Open { .. } => builder.open(),
        ConnectionSecret::Passphrase { psk } => builder.wpa_psk(psk.as_str()),
        ConnectionSecret::Enterprise(eap) => builder.wpa_eap(eap),
    };

    builder.build()
}

/// Builds the access-point profile for a hotspot.
///
/// The profile never autoconnects, runs on 2.4 GHz, broadcasts its SSID and
/// pins WPA2 to CCMP with PMF disabled; some clients refuse to associate
/// when NetworkManager falls back to TKIP or negotiates PMF.
pub fn build_hotspot_connection(
    request: &HotspotRequest,
    addressing: &HotspotAddressing,
) -> ConnectionProfile {
    let address = IpConfig::new(addressing.address.to_string(), addressing.prefix);

    WifiConnectionBuilder::new(request.ssid.as_str())
        .mode(WifiMode::Ap)
        .band(WifiBand::Bg)
        .hidden(false)
        .wpa_psk(request.passphrase.as_str())
        .pmf(Pmf::Disable)
        .pairwise(&["ccmp"])
        .connection(|c| {
            let c = c
                .autoconnect(false)
                .autoconnect_priority(0)
                .ipv4_shared(vec![address])
                .ipv4_gateway(addressing.gateway)
                .ipv6_ignore();
            match &request.interface {
                Some(iface) => c.interface_name(iface.as_str()),
                None => c,
            }
        })
        .build()
}
