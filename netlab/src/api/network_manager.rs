use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::api::config::WifiConfig;
use crate::api::models::{
    AccessPoint, ConnectionSecret, Connectivity, HotspotRequest, ScanRequest,
};
use crate::bus::NetworkBus;
use crate::core::connection::connect;
use crate::core::connectivity::check_connectivity;
use crate::core::hotspot::{start_hotspot, stop_hotspot};
use crate::core::scan::scan;
use crate::dbus::SystemBus;

/// High-level entry point for Wi-Fi scanning, connecting and hotspots.
///
/// Every operation is request/response: the returned future resolves once
/// NetworkManager has reached a terminal state, the configured deadline has
/// elapsed, or the caller cancelled.
///
/// # Creating an Instance
///
/// ```no_run
/// use netlab::WifiManager;
///
/// # async fn example() -> netlab::Result<()> {
/// let wifi = WifiManager::new().await?;
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ## Scan, then connect
///
/// ```no_run
/// use netlab::{ConnectionSecret, ScanRequest, WifiManager};
///
/// # async fn example() -> netlab::Result<()> {
/// let wifi = WifiManager::new().await?;
///
/// for ap in wifi.scan(ScanRequest::all()).await? {
///     println!("{:<32} {:>4} dBm  ch {:<3} {}", ap.ssid, ap.rssi, ap.channel, ap.security);
/// }
///
/// wifi.connect("MyNetwork", ConnectionSecret::Passphrase {
///     psk: "password".into()
/// }).await?;
/// # Ok(())
/// # }
/// ```
///
/// ## Hotspot
///
/// ```no_run
/// use netlab::{HotspotRequest, WifiManager};
///
/// # async fn example() -> netlab::Result<()> {
/// let wifi = WifiManager::new().await?;
/// wifi.start_hotspot(HotspotRequest::new("lab-ap", "correct horse").on_interface("wlan1")).await?;
/// // ...
/// wifi.stop_hotspot("lab-ap", true).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `WifiManager` is `Clone` and can be shared across tasks. Clones share the
/// bus connection; each operation opens and closes its own signal
/// subscription.
#[derive(Clone)]
pub struct WifiManager {
    bus: Arc<dyn NetworkBus>,
    config: WifiConfig,
}

impl WifiManager {
    /// Connects to the system D-Bus with the default configuration.
    pub async fn new() -> Result<Self> {
        Self::with_config(WifiConfig::default()).await
    }

    /// Connects to the system D-Bus with a custom configuration.
    pub async fn with_config(config: WifiConfig) -> Result<Self> {
        let bus = SystemBus::connect().await?;
        Ok(Self::from_bus(bus, config))
    }

    /// Runs the workflows against any [`NetworkBus`].
    pub fn from_bus(bus: impl NetworkBus + 'static, config: WifiConfig) -> Self {
        Self {
            bus: Arc::new(bus),
            config,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &WifiConfig {
        &self.config
    }

    /// Scans for access points, strongest first.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidScanDuration` if the requested
    /// duration is over the configured cap. Per-device failures are skipped,
    /// not returned.
    pub async fn scan(&self, request: ScanRequest) -> Result<Vec<AccessPoint>> {
        self.scan_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// [`scan`](Self::scan) that stops early when `cancel` fires.
    pub async fn scan_with_cancel(
        &self,
        request: ScanRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<AccessPoint>> {
        scan(self.bus.as_ref(), &self.config, &request, cancel).await
    }

    /// Connects to a Wi-Fi network.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidSecret` for an unconfirmed open
    /// secret, `ConnectionError::NoWifiDevice` without a Wi-Fi adapter,
    /// `ConnectionError::AuthFailed` if NetworkManager rejects the
    /// credentials, and `ConnectionError::Timeout` if the connection does not
    /// come up in time.
    pub async fn connect(&self, ssid: &str, secret: ConnectionSecret) -> Result<()> {
        self.connect_with_cancel(ssid, secret, &CancellationToken::new())
            .await
    }

    /// [`connect`](Self::connect) that can be abandoned mid-activation.
    ///
    /// On cancellation the half-activated connection is deactivated.
    pub async fn connect_with_cancel(
        &self,
        ssid: &str,
        secret: ConnectionSecret,
        cancel: &CancellationToken,
    ) -> Result<()> {
        connect(self.bus.as_ref(), &self.config, ssid, &secret, cancel).await
    }

    /// Starts a WPA2 hotspot, replacing any saved profile with the same SSID.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InterfaceNotFound` or
    /// `ConnectionError::NoWifiDevice` if no device fits the request, and
    /// `ConnectionError::HotspotTimeout` if the hotspot does not come up in
    /// time.
    pub async fn start_hotspot(&self, request: HotspotRequest) -> Result<()> {
        self.start_hotspot_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// [`start_hotspot`](Self::start_hotspot) that can be abandoned
    /// mid-activation.
    pub async fn start_hotspot_with_cancel(
        &self,
        request: HotspotRequest,
        cancel: &CancellationToken,
    ) -> Result<()> {
        start_hotspot(self.bus.as_ref(), &self.config, &request, cancel).await
    }

    /// Stops the hotspot broadcasting `ssid`, optionally forgetting its profile.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NoSavedConnection` if no profile carries
    /// this SSID.
    pub async fn stop_hotspot(&self, ssid: &str, delete_profile: bool) -> Result<()> {
        stop_hotspot(self.bus.as_ref(), ssid, delete_profile).await
    }

    /// Asks NetworkManager whether the internet is reachable.
    ///
    /// A zero `timeout` uses the configured default.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ConnectivityTimeout` if NetworkManager does
    /// not answer in time.
    pub async fn check_connectivity(&self, timeout: Duration) -> Result<Connectivity> {
        check_connectivity(self.bus.as_ref(), &self.config, timeout).await
    }
}

impl fmt::Debug for WifiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
