//! [`NetworkBus`] over the system D-Bus.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use futures::future;
use log::{debug, warn};
use zbus::message::Type as MessageType;
use zbus::{Connection, MatchRule, Message, MessageStream};
use zvariant::{ObjectPath, OwnedObjectPath};

use super::{
    NMAccessPointProxy, NMActiveConnectionProxy, NMDeviceProxy, NMProxy,
    NMSettingsConnectionProxy, NMSettingsProxy, NMWirelessProxy,
};
use crate::Result;
use crate::api::builders::ConnectionProfile;
use crate::bus::{BusSignal, NetworkBus, RawAccessPoint, SettingsMap, SignalStream};
use crate::types::constants::paths;

const NM_SERVICE: &str = "org.freedesktop.NetworkManager";
const ACTIVE_CONNECTION_INTERFACE: &str = "org.freedesktop.NetworkManager.Connection.Active";
const STATE_CHANGED: &str = "StateChanged";

/// Production bus backed by a shared `zbus::Connection`.
///
/// Cloning is cheap; clones share the underlying connection, which is safe
/// for concurrent calls and subscriptions.
#[derive(Debug, Clone)]
pub struct SystemBus {
    conn: Connection,
}

impl SystemBus {
    /// Connects to the system bus.
    pub async fn connect() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn device_proxy(&self, device: &OwnedObjectPath) -> Result<NMDeviceProxy<'_>> {
        Ok(NMDeviceProxy::builder(&self.conn)
            .path(device.clone())?
            .build()
            .await?)
    }

    async fn wireless_proxy(&self, device: &OwnedObjectPath) -> Result<NMWirelessProxy<'_>> {
        Ok(NMWirelessProxy::builder(&self.conn)
            .path(device.clone())?
            .build()
            .await?)
    }

    async fn active_proxy(&self, active: &OwnedObjectPath) -> Result<NMActiveConnectionProxy<'_>> {
        Ok(NMActiveConnectionProxy::builder(&self.conn)
            .path(active.clone())?
            .build()
            .await?)
    }

    async fn settings_connection_proxy(
        &self,
        profile: &OwnedObjectPath,
    ) -> Result<NMSettingsConnectionProxy<'_>> {
        Ok(NMSettingsConnectionProxy::builder(&self.conn)
            .path(profile.clone())?
            .build()
            .await?)
    }
}

#[async_trait]
impl NetworkBus for SystemBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        Ok(nm.all_devices().await?)
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        Ok(self.device_proxy(device).await?.device_type().await?)
    }

    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String> {
        Ok(self.device_proxy(device).await?.interface().await?)
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        let wireless = self.wireless_proxy(device).await?;
        wireless.request_scan(HashMap::new()).await?;
        Ok(())
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.wireless_proxy(device).await?.get_access_points().await?)
    }

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<RawAccessPoint> {
        let proxy = NMAccessPointProxy::builder(&self.conn)
            .path(ap.clone())?
            .build()
            .await?;

        Ok(RawAccessPoint {
            ssid: proxy.ssid().await?,
            hw_address: proxy.hw_address().await?,
            frequency: proxy.frequency().await?,
            strength: proxy.strength().await?,
            wpa_flags: proxy.wpa_flags().await?,
            rsn_flags: proxy.rsn_flags().await?,
        })
    }

    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        Ok(settings.list_connections().await?)
    }

    async fn connection_settings(&self, profile: &OwnedObjectPath) -> Result<SettingsMap> {
        let proxy = self.settings_connection_proxy(profile).await?;
        Ok(proxy.get_settings().await?)
    }

    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let path = settings.add_connection(profile).await?;
        debug!("Added connection profile {}", path.as_str());
        Ok(path)
    }

    async fn delete_connection(&self, profile: &OwnedObjectPath) -> Result<()> {
        let proxy = self.settings_connection_proxy(profile).await?;
        proxy.delete().await?;
        Ok(())
    }

    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        let nm = NMProxy::new(&self.conn).await?;
        let specific = OwnedObjectPath::from(ObjectPath::from_static_str_unchecked(paths::NONE));
        Ok(nm
            .activate_connection(profile.clone(), device.clone(), specific)
            .await?)
    }

    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.deactivate_connection(active.clone()).await?;
        Ok(())
    }

    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        Ok(nm.active_connections().await?)
    }

    async fn active_connection_devices(
        &self,
        active: &OwnedObjectPath,
    ) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.active_proxy(active).await?.devices().await?)
    }

    async fn active_connection_profile(
        &self,
        active: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        Ok(self.active_proxy(active).await?.connection().await?)
    }

    async fn check_connectivity(&self) -> Result<u32> {
        let nm = NMProxy::new(&self.conn).await?;
        Ok(nm.check_connectivity().await?)
    }

    async fn subscribe_state_changes(&self, capacity: usize) -> Result<SignalStream> {
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .sender(NM_SERVICE)?
            .interface(ACTIVE_CONNECTION_INTERFACE)?
            .member(STATE_CHANGED)?
            .build();

        let stream = MessageStream::for_match_rule(rule, &self.conn, Some(capacity)).await?;
        debug!("Subscribed to {ACTIVE_CONNECTION_INTERFACE}.{STATE_CHANGED}");

        Ok(stream
            .filter_map(|msg| future::ready(decode_signal(msg)))
            .boxed())
    }
}

/// Turns a raw bus message into a [`BusSignal`], dropping undecodable ones.
fn decode_signal(msg: zbus::Result<Message>) -> Option<BusSignal> {
    let msg = match msg {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Dropping malformed signal: {e}");
            return None;
        }
    };

    let header = msg.header();
    let member = header
        .member()
        .map(|m| m.to_string())
        .unwrap_or_default();

    if member != STATE_CHANGED {
        return Some(BusSignal::Other { member });
    }

    let path = OwnedObjectPath::from(header.path()?.to_owned());

    match msg.body().deserialize::<(u32, u32)>() {
        Ok((state, reason)) => Some(BusSignal::ActiveStateChanged {
            path,
            state,
            reason,
        }),
        Err(e) => {
            warn!("Dropping StateChanged on {}: {e}", path.as_str());
            None
        }
    }
}
