//! Wi-Fi orchestration over NetworkManager's D-Bus API.
//!
//! This crate provides a high-level async API for three operations:
//!
//! - Scanning for access points, classified by security, channel and signal
//! - Connecting to open, WPA-PSK and WPA-EAP networks
//! - Running a WPA2 hotspot, and tearing it down again
//!
//! It can also ask NetworkManager whether the internet is reachable.
//!
//! # Example
//!
//! ```no_run
//! use netlab::{ConnectionSecret, ScanRequest, WifiManager};
//!
//! # async fn example() -> netlab::Result<()> {
//! let wifi = WifiManager::new().await?;
//!
//! for ap in wifi.scan(ScanRequest::all()).await? {
//!     println!("{} ({} dBm, {})", ap.ssid, ap.rssi, ap.signal_rating);
//! }
//!
//! wifi.connect("MyNetwork", ConnectionSecret::Passphrase {
//!     psk: "password123".into()
//! }).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ConnectionError>`. Malformed requests are
//! rejected before any D-Bus call; [`ConnectionError::kind`] groups the
//! variants for callers that only need a status code.
//!
//! # Signal-Based State Monitoring
//!
//! Activations are confirmed by NetworkManager's
//! `Connection.Active.StateChanged` signal rather than by polling. Each
//! operation subscribes before it activates anything, waits for a matching
//! terminal state under a deadline, and drops its subscription on return.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade and installs no
//! logger of its own.

mod bus;
mod core;
mod dbus;
mod types;

pub mod api;

pub use api::builders;
pub use api::config::{HotspotAddressing, WifiConfig};
pub use api::models::{
    AccessPoint, ActivationState, ConnectionError, ConnectionSecret, ConnectionStateReason,
    Connectivity, EapConfig, ErrorKind, HotspotRequest, ScanRequest, SecurityType, SignalRating,
    connection_state_reason_to_error,
};
pub use api::network_manager::WifiManager;
pub use bus::{BusSignal, NetworkBus, RawAccessPoint, SettingsMap, SignalStream};
pub use crate::core::classify::{classify_security, frequency_to_channel, rate_signal};
pub use dbus::SystemBus;

/// A specialized `Result` type for network operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;
