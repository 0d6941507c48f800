//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the numeric codes used by NetworkManager's
//! D-Bus API for device types, access point security flags, and other values.

/// NetworkManager device type constants.
pub mod device_type {
    pub const WIFI: u32 = 2;
}

/// Access point security flags (`NM80211ApSecurityFlags`).
///
/// Shared by the `WpaFlags` and `RsnFlags` access point properties.
pub mod security_flags {
    pub const PAIR_WEP40: u32 = 0x0001;
    pub const PAIR_WEP104: u32 = 0x0002;
    pub const PAIR_TKIP: u32 = 0x0004;
    pub const PAIR_CCMP: u32 = 0x0008;
    pub const GROUP_WEP40: u32 = 0x0010;
    pub const GROUP_WEP104: u32 = 0x0020;
    pub const GROUP_TKIP: u32 = 0x0040;
    pub const GROUP_CCMP: u32 = 0x0080;
    pub const KEY_MGMT_PSK: u32 = 0x0100;
    pub const KEY_MGMT_802_1X: u32 = 0x0200;
}

/// Setting group and key names used in connection profiles.
pub mod settings {
    pub const CONNECTION: &str = "connection";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const IEEE_8021X: &str = "802-1x";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";
}

/// Well-known object paths.
pub mod paths {
    /// Placeholder passed as `specific_object` when NetworkManager should pick one.
    pub const NONE: &str = "/";
}

/// Default timeouts for the deadline-bound workflows.
pub mod timeouts {
    use std::time::Duration;

    /// Client connection activation deadline.
    const CONNECT_TIMEOUT_SECS: u64 = 60;

    /// Hotspot activation deadline.
    const HOTSPOT_TIMEOUT_SECS: u64 = 30;

    /// Scan duration used when the caller passes zero.
    const SCAN_DEFAULT_SECS: u64 = 10;

    /// Largest scan duration a caller may request.
    const SCAN_CAP_SECS: u64 = 60;

    /// Connectivity check deadline when the caller passes zero.
    const CONNECTIVITY_TIMEOUT_SECS: u64 = 5;

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }

    pub fn hotspot_timeout() -> Duration {
        Duration::from_secs(HOTSPOT_TIMEOUT_SECS)
    }

    pub fn scan_default() -> Duration {
        Duration::from_secs(SCAN_DEFAULT_SECS)
    }

    pub fn scan_cap() -> Duration {
        Duration::from_secs(SCAN_CAP_SECS)
    }

    pub fn connectivity_timeout() -> Duration {
        Duration::from_secs(CONNECTIVITY_TIMEOUT_SECS)
    }
}

/// Buffered signals held per subscription before the bus starts dropping.
pub const SIGNAL_QUEUE_CAPACITY: usize = 10;
