//! `org.freedesktop.NetworkManager.AccessPoint`.

use zbus::{Result, proxy};

/// One BSS seen by a wireless device during its last scan.
#[proxy(
    interface = "org.freedesktop.NetworkManager.AccessPoint",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMAccessPoint {
    /// Raw SSID bytes; not necessarily UTF-8, empty for hidden networks.
    #[zbus(property)]
    fn ssid(&self) -> Result<Vec<u8>>;

    /// Signal strength, read as a negated dBm value.
    #[zbus(property)]
    fn strength(&self) -> Result<u8>;

    #[zbus(property)]
    fn hw_address(&self) -> Result<String>;

    /// `NM80211ApSecurityFlags` advertised in the WPA IE.
    #[zbus(property)]
    fn wpa_flags(&self) -> Result<u32>;

    /// `NM80211ApSecurityFlags` advertised in the RSN IE.
    #[zbus(property)]
    fn rsn_flags(&self) -> Result<u32>;

    /// MHz.
    #[zbus(property)]
    fn frequency(&self) -> Result<u32>;
}
