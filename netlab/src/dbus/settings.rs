//! NetworkManager settings proxies.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, OwnedValue};

/// Proxy for the settings collection (saved profiles).
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager/Settings"
)]
pub trait NMSettings {
    /// Paths of every saved connection profile.
    fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Persists a new profile and returns its path.
    fn add_connection(
        &self,
        connection: &HashMap<&str, HashMap<&str, zvariant::Value<'_>>>,
    ) -> Result<OwnedObjectPath>;
}

/// Proxy for a single saved profile.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// Profile settings without secrets.
    fn get_settings(&self) -> Result<HashMap<String, HashMap<String, OwnedValue>>>;

    /// Removes the profile from disk and from NetworkManager.
    fn delete(&self) -> Result<()>;
}
