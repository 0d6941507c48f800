//! Runtime configuration for the orchestration workflows.
//!
//! A [`WifiConfig`] is handed to [`WifiManager::with_config`](crate::WifiManager::with_config)
//! once at startup and read by every workflow invocation. Nothing in here is
//! mutated after construction.

use std::net::Ipv4Addr;
use std::time::Duration;

use crate::types::constants::{SIGNAL_QUEUE_CAPACITY, timeouts};

/// Static IPv4 addressing handed out by the hotspot.
///
/// NetworkManager's `shared` method runs a DHCP server and NAT on the
/// hotspot interface using this address as the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotspotAddressing {
    pub address: Ipv4Addr,
    pub prefix: u32,
    pub gateway: Ipv4Addr,
}

impl HotspotAddressing {
    pub fn new(address: Ipv4Addr, prefix: u32) -> Self {
        Self {
            address,
            prefix,
            gateway: address,
        }
    }
}

impl Default for HotspotAddressing {
    fn default() -> Self {
        Self::new(Ipv4Addr::new(172, 24, 1, 1), 24)
    }
}

/// Timeouts and static data used by [`WifiManager`](crate::WifiManager).
///
/// # Example
///
/// ```rust
/// use netlab::WifiConfig;
/// use std::time::Duration;
///
/// let config = WifiConfig::new()
///     .with_connect_timeout(Duration::from_secs(90))
///     .with_hotspot_timeout(Duration::from_secs(45));
///
/// assert_eq!(config.connect_timeout, Duration::from_secs(90));
/// assert_eq!(config.hotspot.prefix, 24);
/// ```
#[derive(Debug, Clone)]
pub struct WifiConfig {
    /// Deadline for a client connection to reach the activated state.
    pub connect_timeout: Duration,
    /// Deadline for a hotspot to reach the activated state.
    pub hotspot_timeout: Duration,
    /// Scan duration used when a request passes zero.
    pub scan_default: Duration,
    /// Largest scan duration accepted.
    pub scan_cap: Duration,
    /// Connectivity check deadline used when a caller passes zero.
    pub connectivity_timeout: Duration,
    /// Signals buffered per subscription.
    pub signal_capacity: usize,
    /// Hotspot IPv4 addressing.
    pub hotspot: HotspotAddressing,
}

impl WifiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_hotspot_timeout(mut self, timeout: Duration) -> Self {
        self.hotspot_timeout = timeout;
        self
    }

    pub fn with_scan_default(mut self, duration: Duration) -> Self {
        self.scan_default = duration;
        self
    }

    pub fn with_scan_cap(mut self, cap: Duration) -> Self {
        self.scan_cap = cap;
        self
    }

    pub fn with_connectivity_timeout(mut self, timeout: Duration) -> Self {
        self.connectivity_timeout = timeout;
        self
    }

    pub fn with_signal_capacity(mut self, capacity: usize) -> Self {
        self.signal_capacity = capacity.max(1);
        self
    }

    pub fn with_hotspot_addressing(mut self, addressing: HotspotAddressing) -> Self {
        self.hotspot = addressing;
        self
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            connect_timeout: timeouts::connect_timeout(),
            hotspot_timeout: timeouts::hotspot_timeout(),
            scan_default: timeouts::scan_default(),
            scan_cap: timeouts::scan_cap(),
            connectivity_timeout: timeouts::connectivity_timeout(),
            signal_capacity: SIGNAL_QUEUE_CAPACITY,
            hotspot: HotspotAddressing::default(),
        }
    }
}
