//! Connection profile builders.
//!
//! These construct the nested settings dictionaries NetworkManager accepts in
//! `Settings.AddConnection`.
//!
//! Most users should go through [`WifiManager`](crate::WifiManager), which
//! builds and submits profiles itself. The builders are exposed for callers
//! that want to inspect or tweak a profile first.
//!
//! # Examples
//!
//! ```rust
//! use netlab::builders::build_client_connection;
//! use netlab::ConnectionSecret;
//!
//! let settings = build_client_connection(
//!     "MyNetwork",
//!     &ConnectionSecret::Passphrase { psk: "password".into() },
//! );
//! assert!(settings.contains_key("802-11-wireless-security"));
//! ```

use std::collections::HashMap;
use zvariant::Value;

pub mod connection_builder;
pub mod wifi;
pub mod wifi_builder;

pub use connection_builder::{ConnectionBuilder, IpConfig};
pub use wifi::{build_client_connection, build_hotspot_connection};
pub use wifi_builder::{Pmf, WifiBand, WifiConnectionBuilder, WifiMode};

/// Settings groups keyed by group name, each a map of key to variant value.
pub type ConnectionProfile = HashMap<&'static str, HashMap<&'static str, Value<'static>>>;
