//! `org.freedesktop.NetworkManager.Device`.

use zbus::{Result, proxy};

#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMDevice {
    /// Kernel interface name, e.g. `wlan0`.
    #[zbus(property)]
    fn interface(&self) -> Result<String>;

    /// `NMDeviceType`; Wi-Fi is 2.
    #[zbus(property)]
    fn device_type(&self) -> Result<u32>;
}
