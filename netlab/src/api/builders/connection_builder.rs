//! The part of a NetworkManager profile that is not Wi-Fi specific.
//!
//! [`ConnectionBuilder`] writes the `connection`, `ipv4` and `ipv6` groups.
//! [`WifiConnectionBuilder`](super::WifiConnectionBuilder) wraps it and adds
//! the wireless groups.
//!
//! # Example
//!
//! ```rust
//! use netlab::builders::ConnectionBuilder;
//!
//! let settings = ConnectionBuilder::new("802-11-wireless", "HomeNetwork")
//!     .autoconnect(true)
//!     .ipv4_auto()
//!     .ipv6_auto()
//!     .build();
//!
//! assert!(settings.contains_key("connection"));
//! ```

use std::collections::HashMap;
use std::net::Ipv4Addr;
use uuid::Uuid;
use zvariant::Value;

use super::ConnectionProfile;
use crate::types::constants::settings;

/// One static address with its CIDR prefix length.
#[derive(Debug, Clone)]
pub struct IpConfig {
    pub address: String,
    pub prefix: u32,
}

impl IpConfig {
    pub fn new(address: impl Into<String>, prefix: u32) -> Self {
        Self {
            address: address.into(),
            prefix,
        }
    }
}

/// Builds the settings groups every profile carries.
///
/// The `connection` group is created up front with a random UUID.
/// NetworkManager rejects profiles without one. IP groups are only present
/// once one of the `ipv4_*` / `ipv6_*` methods picks a method.
#[derive(Debug)]
pub struct ConnectionBuilder {
    settings: ConnectionProfile,
}

type Section = HashMap<&'static str, Value<'static>>;

impl ConnectionBuilder {
    pub fn new(connection_type: &str, id: impl Into<String>) -> Self {
        let connection: Section = HashMap::from([
            ("type", Value::from(connection_type.to_owned())),
            ("id", Value::from(id.into())),
            ("uuid", Value::from(Uuid::new_v4().to_string())),
        ]);

        Self {
            settings: HashMap::from([(settings::CONNECTION, connection)]),
        }
    }

    /// Replaces the random UUID.
    pub fn uuid(self, uuid: Uuid) -> Self {
        self.set_connection("uuid", Value::from(uuid.to_string()))
    }

    /// Binds the profile to one interface, e.g. `"wlan0"`.
    pub fn interface_name(self, name: impl Into<String>) -> Self {
        self.set_connection("interface-name", Value::from(name.into()))
    }

    pub fn autoconnect(self, enabled: bool) -> Self {
        self.set_connection("autoconnect", Value::from(enabled))
    }

    /// Higher values win when several profiles could autoconnect.
    pub fn autoconnect_priority(self, priority: i32) -> Self {
        self.set_connection("autoconnect-priority", Value::from(priority))
    }

    /// DHCP.
    pub fn ipv4_auto(self) -> Self {
        self.with_method(settings::IPV4, "auto")
    }

    /// Internet connection sharing: NetworkManager runs DHCP and NAT on the
    /// interface.
    ///
    /// With `addresses`, the interface takes those addresses and the first
    /// one is what clients see as their gateway.
    pub fn ipv4_shared(self, addresses: Vec<IpConfig>) -> Self {
        let mut this = self.with_method(settings::IPV4, "shared");
        if addresses.is_empty() {
            return this;
        }

        let address_data: Vec<HashMap<String, Value<'static>>> = addresses
            .into_iter()
            .map(|ip| {
                HashMap::from([
                    ("address".to_owned(), Value::from(ip.address)),
                    ("prefix".to_owned(), Value::from(ip.prefix)),
                ])
            })
            .collect();

        if let Some(ipv4) = this.settings.get_mut(settings::IPV4) {
            ipv4.insert("address-data", Value::from(address_data));
        }
        this
    }

    /// Sets the IPv4 gateway. Ignored until an IPv4 method is chosen.
    pub fn ipv4_gateway(mut self, gateway: Ipv4Addr) -> Self {
        if let Some(ipv4) = self.settings.get_mut(settings::IPV4) {
            ipv4.insert("gateway", Value::from(gateway.to_string()));
        }
        self
    }

    /// SLAAC or DHCPv6.
    pub fn ipv6_auto(self) -> Self {
        self.with_method(settings::IPV6, "auto")
    }

    pub fn ipv6_ignore(self) -> Self {
        self.with_method(settings::IPV6, "ignore")
    }

    /// Inserts a whole settings group, replacing any group of that name.
    pub fn with_section(mut self, name: &'static str, section: Section) -> Self {
        self.settings.insert(name, section);
        self
    }

    pub fn build(self) -> ConnectionProfile {
        self.settings
    }

    fn set_connection(mut self, key: &'static str, value: Value<'static>) -> Self {
        if let Some(conn) = self.settings.get_mut(settings::CONNECTION) {
            conn.insert(key, value);
        }
        self
    }

    fn with_method(mut self, group: &'static str, method: &'static str) -> Self {
        self.settings
            .insert(group, HashMap::from([("method", Value::from(method))]));
        self
    }
}
