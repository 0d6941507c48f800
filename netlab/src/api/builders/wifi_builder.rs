//! Builder for the `802-11-wireless` side of a profile.
//!
//! [`WifiConnectionBuilder`] owns the radio and key-management choices and
//! wraps a [`ConnectionBuilder`] for everything that is not Wi-Fi specific.
//! The same builder produces client profiles and access-point profiles.

use std::collections::HashMap;
use zvariant::Value;

use super::ConnectionProfile;
use super::connection_builder::ConnectionBuilder;
use crate::api::models::EapConfig;
use crate::types::constants::settings;

/// Radio band a profile is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiBand {
    /// 2.4 GHz
    Bg,
    /// 5 GHz
    A,
}

impl WifiBand {
    fn as_str(self) -> &'static str {
        match self {
            Self::Bg => "bg",
            Self::A => "a",
        }
    }
}

/// Whether the interface joins a network or is the access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiMode {
    #[default]
    Infrastructure,
    Ap,
}

impl WifiMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Ap => "ap",
        }
    }
}

/// Management frame protection (802.11w) policy, as NetworkManager encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pmf {
    Default = 0,
    Disable = 1,
    Optional = 2,
    Required = 3,
}

#[derive(Debug, Clone, Default)]
enum KeyManagement {
    #[default]
    None,
    Psk(String),
    Eap(EapConfig),
}

/// Wi-Fi profile builder.
///
/// Key management defaults to none, which produces a profile without a
/// security group. PMF and cipher restrictions are only written when a key
/// management scheme is set.
///
/// # Examples
///
/// ```rust
/// use netlab::builders::WifiConnectionBuilder;
///
/// let settings = WifiConnectionBuilder::new("HomeNetwork")
///     .wpa_psk("my_secure_password")
///     .connection(|c| c.autoconnect(true).ipv4_auto().ipv6_auto())
///     .build();
///
/// assert!(settings.contains_key("802-11-wireless-security"));
/// ```
///
/// An access point sharing its uplink:
///
/// ```rust
/// use netlab::builders::{Pmf, WifiBand, WifiConnectionBuilder, WifiMode};
///
/// let settings = WifiConnectionBuilder::new("lab-ap")
///     .mode(WifiMode::Ap)
///     .band(WifiBand::Bg)
///     .wpa_psk("correct horse")
///     .pmf(Pmf::Disable)
///     .connection(|c| c.ipv4_shared(Vec::new()).ipv6_ignore())
///     .build();
///
/// assert!(settings.contains_key("ipv4"));
/// ```
#[derive(Debug)]
pub struct WifiConnectionBuilder {
    base: ConnectionBuilder,
    ssid: String,
    mode: WifiMode,
    key_mgmt: KeyManagement,
    pmf: Option<Pmf>,
    pairwise: Vec<String>,
    hidden: Option<bool>,
    band: Option<WifiBand>,
    bssid: Option<String>,
}

impl WifiConnectionBuilder {
    /// Starts an open infrastructure profile whose id is the SSID.
    pub fn new(ssid: impl Into<String>) -> Self {
        let ssid = ssid.into();
        Self {
            base: ConnectionBuilder::new(settings::WIRELESS, ssid.clone()),
            ssid,
            mode: WifiMode::default(),
            key_mgmt: KeyManagement::None,
            pmf: None,
            pairwise: Vec::new(),
            hidden: None,
            band: None,
            bssid: None,
        }
    }

    /// Applies `f` to the wrapped [`ConnectionBuilder`].
    ///
    /// Use it for autoconnect, interface binding and IP configuration.
    pub fn connection(mut self, f: impl FnOnce(ConnectionBuilder) -> ConnectionBuilder) -> Self {
        self.base = f(self.base);
        self
    }

    /// Drops any key management; the profile will be unencrypted.
    pub fn open(mut self) -> Self {
        self.key_mgmt = KeyManagement::None;
        self
    }

    /// WPA/WPA2 personal with a passphrase or raw 64-hex key.
    pub fn wpa_psk(mut self, psk: impl Into<String>) -> Self {
        self.key_mgmt = KeyManagement::Psk(psk.into());
        self
    }

    /// WPA/WPA2 enterprise via 802.1X.
    ///
    /// The supplicant may pick TLS, PEAP or TTLS; certificate paths are
    /// passed through when present.
    pub fn wpa_eap(mut self, eap: &EapConfig) -> Self {
        self.key_mgmt = KeyManagement::Eap(eap.clone());
        self
    }

    pub fn pmf(mut self, pmf: Pmf) -> Self {
        self.pmf = Some(pmf);
        self
    }

    /// Limits the pairwise ciphers NetworkManager may negotiate.
    pub fn pairwise(mut self, ciphers: &[&str]) -> Self {
        self.pairwise = ciphers.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    pub fn mode(mut self, mode: WifiMode) -> Self {
        self.mode = mode;
        self
    }

    /// For clients: the network does not broadcast its SSID. For access
    /// points: do not broadcast it.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn band(mut self, band: WifiBand) -> Self {
        self.band = Some(band);
        self
    }

    /// Locks a client profile to one access point, e.g. `"00:11:22:33:44:55"`.
    pub fn bssid(mut self, bssid: impl Into<String>) -> Self {
        self.bssid = Some(bssid.into());
        self
    }

    /// Assembles the profile.
    pub fn build(self) -> ConnectionProfile {
        let mut wireless: HashMap<&'static str, Value<'static>> = HashMap::from([
            ("ssid", Value::from(self.ssid.into_bytes())),
            ("mode", Value::from(self.mode.as_str())),
        ]);
        if let Some(hidden) = self.hidden {
            wireless.insert("hidden", Value::from(hidden));
        }
        if let Some(band) = self.band {
            wireless.insert("band", Value::from(band.as_str()));
        }
        if let Some(bssid) = self.bssid {
            wireless.insert("bssid", Value::from(bssid));
        }

        let mut base = self.base;

        let key_mgmt = match self.key_mgmt {
            KeyManagement::None => None,
            KeyManagement::Psk(psk) => Some(HashMap::from([
                ("key-mgmt", Value::from("wpa-psk")),
                ("psk", Value::from(psk)),
            ])),
            KeyManagement::Eap(eap) => {
                base = base.with_section(settings::IEEE_8021X, ieee8021x_section(eap));
                Some(HashMap::from([("key-mgmt", Value::from("wpa-eap"))]))
            }
        };

        if let Some(mut security) = key_mgmt {
            if let Some(pmf) = self.pmf {
                security.insert("pmf", Value::from(pmf as i32));
            }
            if !self.pairwise.is_empty() {
                security.insert("pairwise", Value::from(self.pairwise));
            }
            wireless.insert("security", Value::from(settings::WIRELESS_SECURITY));
            base = base.with_section(settings::WIRELESS_SECURITY, security);
        }

        base.with_section(settings::WIRELESS, wireless).build()
    }
}

fn ieee8021x_section(eap: EapConfig) -> HashMap<&'static str, Value<'static>> {
    let methods: Vec<String> = ["tls", "peap", "ttls"].map(String::from).to_vec();
    let mut section = HashMap::from([
        ("eap", Value::from(methods)),
        ("identity", Value::from(eap.identity)),
        ("password", Value::from(eap.password)),
    ]);
    if let Some(cert) = eap.client_certificate {
        section.insert("client-cert", Value::from(cert));
    }
    if let Some(cert) = eap.ca_certificate {
        section.insert("ca-cert", Value::from(cert));
    }
    section
}
