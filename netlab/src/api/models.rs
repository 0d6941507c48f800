use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Lifecycle state of an active connection, as carried by
/// `Connection.Active.StateChanged`.
///
/// Only [`Activated`](Self::Activated) and [`Deactivated`](Self::Deactivated)
/// end an activation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Unknown,
    Activating,
    Activated,
    Deactivating,
    Deactivated,
    /// A code newer than this crate.
    Other(u32),
}

impl ActivationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Activated | Self::Deactivated)
    }
}

impl From<u32> for ActivationState {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Activating,
            2 => Self::Activated,
            3 => Self::Deactivating,
            4 => Self::Deactivated,
            other => Self::Other(other),
        }
    }
}

impl Display for ActivationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Deactivating => "deactivating",
            Self::Deactivated => "deactivated",
            Self::Other(code) => return write!(f, "state {code}"),
        };
        f.write_str(label)
    }
}

/// Why an active connection changed state (`NMActiveConnectionStateReason`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStateReason {
    Unknown,
    None,
    UserDisconnected,
    DeviceDisconnected,
    ServiceStopped,
    IpConfigInvalid,
    ConnectTimeout,
    ServiceStartTimeout,
    ServiceStartFailed,
    /// NetworkManager had no secrets for the profile, or the agent gave none.
    NoSecrets,
    LoginFailed,
    ConnectionRemoved,
    DependencyFailed,
    DeviceRealizeFailed,
    DeviceRemoved,
    Other(u32),
}

impl ConnectionStateReason {
    /// Whether the reason points at wrong or missing credentials.
    pub fn is_auth_failure(self) -> bool {
        matches!(self, Self::NoSecrets | Self::LoginFailed)
    }
}

impl From<u32> for ConnectionStateReason {
    fn from(code: u32) -> Self {
        use ConnectionStateReason::*;
        const BY_CODE: [ConnectionStateReason; 15] = [
            Unknown,
            None,
            UserDisconnected,
            DeviceDisconnected,
            ServiceStopped,
            IpConfigInvalid,
            ConnectTimeout,
            ServiceStartTimeout,
            ServiceStartFailed,
            NoSecrets,
            LoginFailed,
            ConnectionRemoved,
            DependencyFailed,
            DeviceRealizeFailed,
            DeviceRemoved,
        ];
        BY_CODE
            .get(code as usize)
            .copied()
            .unwrap_or(Other(code))
    }
}

impl Display for ConnectionStateReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::None => "none",
            Self::UserDisconnected => "disconnected by user",
            Self::DeviceDisconnected => "device went away",
            Self::ServiceStopped => "NetworkManager stopped",
            Self::IpConfigInvalid => "no usable IP configuration",
            Self::ConnectTimeout => "timed out while connecting",
            Self::ServiceStartTimeout => "service start timed out",
            Self::ServiceStartFailed => "service failed to start",
            Self::NoSecrets => "secrets missing",
            Self::LoginFailed => "login failed",
            Self::ConnectionRemoved => "profile removed",
            Self::DependencyFailed => "dependency failed",
            Self::DeviceRealizeFailed => "device could not be realized",
            Self::DeviceRemoved => "device removed",
            Self::Other(code) => return write!(f, "reason {code}"),
        };
        f.write_str(label)
    }
}

/// Maps the reason code of a failed activation to the error returned to
/// callers. Credential problems become [`ConnectionError::AuthFailed`].
pub fn connection_state_reason_to_error(code: u32) -> ConnectionError {
    match ConnectionStateReason::from(code) {
        reason if reason.is_auth_failure() => ConnectionError::AuthFailed,
        reason => ConnectionError::ActivationFailed(reason),
    }
}

/// Internet reachability as judged by NetworkManager (`NMConnectivityState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connectivity {
    /// Checking is disabled or has not run yet.
    Unknown,
    /// No network connection at all.
    None,
    /// Behind a captive portal.
    Portal,
    /// Connected, but the check endpoint is unreachable.
    Limited,
    Full,
}

impl Connectivity {
    pub fn is_online(self) -> bool {
        self == Self::Full
    }
}

impl From<u32> for Connectivity {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::None,
            2 => Self::Portal,
            3 => Self::Limited,
            4 => Self::Full,
            _ => Self::Unknown,
        }
    }
}

impl Display for Connectivity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::None => "none",
            Self::Portal => "captive portal",
            Self::Limited => "limited",
            Self::Full => "full",
        })
    }
}

/// Security type inferred from an access point's WPA and RSN flags.
///
/// Variants are ordered from weakest to strongest protection; `Unknown`
/// covers flag combinations that match no known scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityType {
    Open,
    Wep,
    WpaPersonal,
    WpaEnterprise,
    Wpa2Personal,
    Wpa2Enterprise,
    Wpa3Personal,
    Wpa3Enterprise,
    Unknown,
}

impl SecurityType {
    /// Returns `true` if joining the network needs credentials.
    pub fn secured(self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Returns `true` for 802.1X (EAP) key management.
    pub fn is_enterprise(self) -> bool {
        matches!(
            self,
            Self::WpaEnterprise | Self::Wpa2Enterprise | Self::Wpa3Enterprise
        )
    }
}

impl Display for SecurityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Wep => write!(f, "WEP"),
            Self::WpaPersonal => write!(f, "WPA-Personal"),
            Self::WpaEnterprise => write!(f, "WPA-Enterprise"),
            Self::Wpa2Personal => write!(f, "WPA2-Personal"),
            Self::Wpa2Enterprise => write!(f, "WPA2-Enterprise"),
            Self::Wpa3Personal => write!(f, "WPA3-Personal"),
            Self::Wpa3Enterprise => write!(f, "WPA3-Enterprise"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Qualitative signal rating derived from RSSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalRating {
    None,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Display for SignalRating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Poor => write!(f, "poor"),
            Self::Fair => write!(f, "fair"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
        }
    }
}

/// 802.1X credentials for WPA-Enterprise networks.
///
/// Certificate fields hold paths (or `file://` URLs) understood by
/// NetworkManager.
///
/// # Example
///
/// ```rust
/// use netlab::EapConfig;
///
/// let eap = EapConfig::new("user@example.com", "hunter22")
///     .with_ca_certificate("/etc/ssl/certs/corp-ca.pem");
/// assert!(eap.client_certificate.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EapConfig {
    /// Identity, usually a username or e-mail address
    pub identity: String,
    pub password: String,
    /// Client certificate for EAP-TLS
    pub client_certificate: Option<String>,
    /// CA certificate used to validate the authentication server
    pub ca_certificate: Option<String>,
}

impl EapConfig {
    /// Creates a configuration with identity and password only.
    pub fn new(identity: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            password: password.into(),
            client_certificate: None,
            ca_certificate: None,
        }
    }

    /// Sets the client certificate path.
    pub fn with_client_certificate(mut self, path: impl Into<String>) -> Self {
        self.client_certificate = Some(path.into());
        self
    }

    /// Sets the CA certificate path.
    pub fn with_ca_certificate(mut self, path: impl Into<String>) -> Self {
        self.ca_certificate = Some(path.into());
        self
    }
}

/// A visible Wi-Fi access point, classified at scan time.
///
/// Built fresh on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Network name; empty for hidden networks
    pub ssid: String,
    /// Hardware (MAC) address of the access point
    pub bssid: String,
    /// Received signal strength in dBm
    pub rssi: i32,
    /// Operating frequency in MHz
    pub frequency: u32,
    /// Channel number, `0` when the frequency is outside known bands
    pub channel: u32,
    /// Rating derived from `rssi`
    pub signal_rating: SignalRating,
    /// Security scheme inferred from the WPA/RSN flags
    pub security: SecurityType,
    /// Enterprise configuration, if known
    pub eap_config: Option<EapConfig>,
}

impl AccessPoint {
    /// Returns `true` if the access point does not broadcast its SSID.
    pub fn is_hidden(&self) -> bool {
        self.ssid.is_empty()
    }
}

/// Credentials supplied with a connect request.
///
/// Exactly one variant is populated per request.
///
/// # Examples
///
/// ```rust
/// use netlab::{ConnectionSecret, EapConfig};
///
/// let open = ConnectionSecret::Open { confirmed: true };
/// let home = ConnectionSecret::Passphrase { psk: "correct horse".into() };
/// let corp = ConnectionSecret::Enterprise(EapConfig::new("alice", "s3cret"));
/// # let _ = (open, home, corp);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionSecret {
    /// Open network. `confirmed` must be `true`; a request that sets it to
    /// `false` should have supplied one of the other variants instead.
    Open { confirmed: bool },
    /// WPA/WPA2 Personal pre-shared key
    Passphrase { psk: String },
    /// WPA/WPA2 Enterprise (802.1X)
    Enterprise(EapConfig),
}

impl ConnectionSecret {
    /// Returns `true` if this secret requires authentication.
    pub fn secured(&self) -> bool {
        !matches!(self, Self::Open { .. })
    }

    /// Returns `true` for the pre-shared key variant.
    pub fn is_psk(&self) -> bool {
        matches!(self, Self::Passphrase { .. })
    }

    /// Returns `true` for the 802.1X variant.
    pub fn is_eap(&self) -> bool {
        matches!(self, Self::Enterprise(_))
    }
}

/// Parameters for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Only scan on the device with this interface name.
    pub interface: Option<String>,
    /// Upper bound for the whole scan. Zero selects the configured default.
    pub max_duration: std::time::Duration,
}

impl ScanRequest {
    /// Scans every wireless device with the default duration.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the scan to one interface.
    pub fn on_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Sets the scan deadline.
    pub fn with_max_duration(mut self, duration: std::time::Duration) -> Self {
        self.max_duration = duration;
        self
    }
}

/// Parameters for bringing up a hotspot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotspotRequest {
    /// Network name broadcast by the hotspot; also used as the profile id
    pub ssid: String,
    /// WPA2 passphrase
    pub passphrase: String,
    /// Interface to host the hotspot on. `None` picks the first Wi-Fi device.
    pub interface: Option<String>,
}

impl HotspotRequest {
    pub fn new(ssid: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            passphrase: passphrase.into(),
            interface: None,
        }
    }

    /// Pins the hotspot to an interface (e.g. `wlan0`).
    pub fn on_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }
}

/// Coarse classification of [`ConnectionError`] for transport layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any bus interaction.
    Validation,
    /// No matching device or profile.
    NotFound,
    /// An underlying bus call failed.
    Bus,
    /// A deadline elapsed; the final bus-side state is indeterminate.
    Timeout,
    /// NetworkManager reported that the activation failed.
    Activation,
    /// The caller cancelled the operation.
    Cancelled,
}

/// Error returned by every netlab operation.
///
/// Validation variants are returned before any D-Bus call is made. Bus
/// failures are forwarded as-is through [`ConnectionError::Dbus`].
///
/// # Example
///
/// ```no_run
/// use netlab::{ConnectionError, ConnectionSecret, WifiManager};
///
/// # async fn example() -> netlab::Result<()> {
/// let wifi = WifiManager::new().await?;
///
/// match wifi.connect("MyNetwork", ConnectionSecret::Passphrase {
///     psk: "password123".into()
/// }).await {
///     Ok(()) => println!("connected"),
///     Err(ConnectionError::AuthFailed) => eprintln!("Wrong password"),
///     Err(ConnectionError::Timeout) => eprintln!("Connection timed out"),
///     Err(ConnectionError::NoWifiDevice) => eprintln!("No Wi-Fi adapter"),
///     Err(e) => eprintln!("{e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A NetworkManager call or property read failed.
    #[error("bus call failed: {0}")]
    Dbus(#[from] zbus::Error),

    /// An `Open` secret was sent with its flag unset.
    #[error("open secret must be confirmed; supply a passphrase or enterprise secret instead")]
    InvalidSecret,

    /// The SSID is empty or longer than 32 bytes.
    #[error("invalid SSID: {0}")]
    InvalidSsid(String),

    /// The WPA passphrase is malformed.
    #[error("invalid passphrase: {0}")]
    InvalidPassphrase(String),

    /// Requested scan duration exceeds the cap.
    #[error("scan duration {requested:?} exceeds the {cap:?} cap")]
    InvalidScanDuration {
        requested: std::time::Duration,
        cap: std::time::Duration,
    },

    /// No Wi-Fi device was found on the system.
    #[error("no Wi-Fi device found")]
    NoWifiDevice,

    /// No device with the requested interface name exists.
    #[error("no device with interface '{0}'")]
    InterfaceNotFound(String),

    /// No saved profile matches the request.
    #[error("no saved profile for that SSID")]
    NoSavedConnection,

    /// Authentication with the access point failed.
    #[error("authentication failed")]
    AuthFailed,

    /// NetworkManager deactivated the connection while it was activating.
    #[error("activation failed: {0}")]
    ActivationFailed(ConnectionStateReason),

    /// The connection did not reach the activated state in time.
    #[error("timed out waiting for the connection to activate")]
    Timeout,

    /// The hotspot did not reach the activated state in time.
    #[error("hotspot activation timeout")]
    HotspotTimeout,

    /// NetworkManager did not finish its connectivity check in time.
    #[error("connectivity check timed out after {0:?}")]
    ConnectivityTimeout(std::time::Duration),

    /// The caller cancelled the operation while it was waiting.
    #[error("operation cancelled")]
    Cancelled,

    /// The signal stream ended or the connection is in an unexpected state.
    #[error("activation stalled: {0}")]
    Stuck(String),
}

impl ConnectionError {
    /// Returns the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSecret
            | Self::InvalidSsid(_)
            | Self::InvalidPassphrase(_)
            | Self::InvalidScanDuration { .. } => ErrorKind::Validation,
            Self::NoWifiDevice | Self::InterfaceNotFound(_) | Self::NoSavedConnection => {
                ErrorKind::NotFound
            }
            Self::Dbus(_) | Self::Stuck(_) => ErrorKind::Bus,
            Self::Timeout | Self::HotspotTimeout | Self::ConnectivityTimeout(_) => {
                ErrorKind::Timeout
            }
            Self::AuthFailed | Self::ActivationFailed(_) => ErrorKind::Activation,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}
