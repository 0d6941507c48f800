//! The bus contract consumed by the workflows.
//!
//! [`NetworkBus`] is everything the scan, connect and hotspot workflows need
//! from NetworkManager, expressed in terms of object paths and plain values.
//! [`SystemBus`](crate::dbus::SystemBus) implements it over the system D-Bus;
//! tests swap in a scripted fake.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use zvariant::{OwnedObjectPath, OwnedValue};

use crate::Result;
use crate::api::builders::ConnectionProfile;

/// Settings of a saved profile as returned by `GetSettings`.
pub type SettingsMap = HashMap<String, HashMap<String, OwnedValue>>;

/// Raw properties of one access point, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAccessPoint {
    pub ssid: Vec<u8>,
    pub hw_address: String,
    pub frequency: u32,
    /// Strength in negated dBm.
    pub strength: u8,
    pub wpa_flags: u32,
    pub rsn_flags: u32,
}

/// A signal delivered on a state-change subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusSignal {
    /// `Connection.Active.StateChanged` for the active connection at `path`.
    ActiveStateChanged {
        path: OwnedObjectPath,
        state: u32,
        reason: u32,
    },
    /// Anything else that slipped through the match rule.
    Other { member: String },
}

/// Subscription handle. Dropping it unsubscribes.
pub type SignalStream = BoxStream<'static, BusSignal>;

/// NetworkManager operations used by the workflows.
///
/// Every method is a single bus round-trip (or a subscription) and reports
/// failures as [`ConnectionError::Dbus`](crate::ConnectionError::Dbus). No
/// method retries.
#[async_trait]
pub trait NetworkBus: Send + Sync {
    /// All device paths.
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32>;

    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String>;

    /// Asks a wireless device for an active scan.
    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()>;

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<RawAccessPoint>;

    /// Saved profile paths.
    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    async fn connection_settings(&self, profile: &OwnedObjectPath) -> Result<SettingsMap>;

    /// Persists a profile and returns its settings path.
    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath>;

    async fn delete_connection(&self, profile: &OwnedObjectPath) -> Result<()>;

    /// Activates a saved profile on a device and returns the active connection path.
    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath>;

    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()>;

    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    async fn active_connection_devices(
        &self,
        active: &OwnedObjectPath,
    ) -> Result<Vec<OwnedObjectPath>>;

    /// The settings profile behind an active connection.
    async fn active_connection_profile(&self, active: &OwnedObjectPath)
    -> Result<OwnedObjectPath>;

    /// Asks NetworkManager to re-check internet reachability.
    ///
    /// Returns the raw `NMConnectivityState` code.
    async fn check_connectivity(&self) -> Result<u32>;

    /// Opens a subscription to active-connection state changes.
    ///
    /// At most `capacity` signals are buffered.
    async fn subscribe_state_changes(&self, capacity: usize) -> Result<SignalStream>;
}
