//! Scripted in-memory [`NetworkBus`] for workflow tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::channel::mpsc;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::api::builders::ConnectionProfile;
use crate::api::models::ConnectionError;
use crate::bus::{BusSignal, NetworkBus, RawAccessPoint, SettingsMap, SignalStream};
use crate::types::constants::device_type;
use crate::Result;

pub(crate) fn path(s: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(s.to_string()).unwrap()
}

fn owned(value: Value<'_>) -> OwnedValue {
    OwnedValue::try_from(value).expect("settings values hold no file descriptors")
}

fn bus_error(what: &str) -> ConnectionError {
    ConnectionError::Dbus(zbus::Error::Failure(what.to_string()))
}

/// Every call the workflows made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Devices,
    RequestScan(String),
    ListConnections,
    AddConnection(String),
    DeleteConnection(String),
    Activate { profile: String, device: String },
    Deactivate(String),
    ActiveConnections,
    CheckConnectivity,
    Subscribe,
}

/// What the fake emits on every open subscription once a profile is activated.
#[derive(Debug, Clone)]
pub(crate) enum Emit {
    /// A state change on the active connection just created.
    OnNew { state: u32, reason: u32 },
    /// A state change on some other active connection.
    Foreign { path: &'static str, state: u32, reason: u32 },
}

#[derive(Debug, Clone)]
pub(crate) struct FakeDevice {
    pub path: &'static str,
    pub device_type: Option<u32>,
    pub interface: Option<&'static str>,
    pub scan_fails: bool,
    /// Delay before the access point list comes back.
    pub listing_delay: Option<Duration>,
    pub access_points: Vec<(&'static str, Option<RawAccessPoint>)>,
}

impl FakeDevice {
    pub fn wifi(path: &'static str, interface: &'static str) -> Self {
        Self {
            path,
            device_type: Some(device_type::WIFI),
            interface: Some(interface),
            scan_fails: false,
            listing_delay: None,
            access_points: Vec::new(),
        }
    }

    pub fn ethernet(path: &'static str, interface: &'static str) -> Self {
        Self {
            device_type: Some(1),
            ..Self::wifi(path, interface)
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.listing_delay = Some(delay);
        self
    }

    pub fn with_ap(mut self, path: &'static str, ap: RawAccessPoint) -> Self {
        self.access_points.push((path, Some(ap)));
        self
    }

    pub fn with_broken_ap(mut self, path: &'static str) -> Self {
        self.access_points.push((path, None));
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeProfile {
    pub path: OwnedObjectPath,
    pub id: String,
    pub ssid: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeActive {
    pub path: OwnedObjectPath,
    pub profile: OwnedObjectPath,
    pub devices: Vec<OwnedObjectPath>,
}

#[derive(Default)]
struct State {
    devices: Vec<FakeDevice>,
    profiles: Vec<FakeProfile>,
    active: Vec<FakeActive>,
    calls: Vec<Call>,
    subscribers: Vec<mpsc::UnboundedSender<BusSignal>>,
    on_activate: Vec<Emit>,
    fail_add: bool,
    fail_activate: bool,
    fail_deactivate: bool,
    connectivity: u32,
    connectivity_delay: Option<Duration>,
    next_id: u32,
}

/// A NetworkManager stand-in with recorded calls and scripted signals.
#[derive(Default)]
pub(crate) struct FakeBus {
    state: Mutex<State>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(self, device: FakeDevice) -> Self {
        self.state.lock().unwrap().devices.push(device);
        self
    }

    pub fn with_profile(self, profile_path: &str, ssid: &str) -> Self {
        self.state.lock().unwrap().profiles.push(FakeProfile {
            path: path(profile_path),
            id: ssid.to_string(),
            ssid: Some(ssid.as_bytes().to_vec()),
        });
        self
    }

    pub fn with_active(self, active: &str, profile: &str, devices: &[&str]) -> Self {
        self.state.lock().unwrap().active.push(FakeActive {
            path: path(active),
            profile: path(profile),
            devices: devices.iter().map(|d| path(d)).collect(),
        });
        self
    }

    pub fn on_activate(self, emits: Vec<Emit>) -> Self {
        self.state.lock().unwrap().on_activate = emits;
        self
    }

    pub fn failing_add(self) -> Self {
        self.state.lock().unwrap().fail_add = true;
        self
    }

    pub fn failing_activate(self) -> Self {
        self.state.lock().unwrap().fail_activate = true;
        self
    }

    pub fn failing_deactivate(self) -> Self {
        self.state.lock().unwrap().fail_deactivate = true;
        self
    }

    pub fn with_connectivity(self, state: u32) -> Self {
        self.state.lock().unwrap().connectivity = state;
        self
    }

    /// Holds every connectivity check for `delay` before answering.
    pub fn slow_connectivity(self, delay: Duration) -> Self {
        self.state.lock().unwrap().connectivity_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn profiles(&self) -> Vec<FakeProfile> {
        self.state.lock().unwrap().profiles.clone()
    }

    pub fn active(&self) -> Vec<FakeActive> {
        self.state.lock().unwrap().active.clone()
    }

    /// Subscriptions whose receiving end is still alive.
    pub fn open_subscriptions(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .subscribers
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Pushes a signal to every open subscription.
    pub fn emit(&self, signal: BusSignal) {
        let state = self.state.lock().unwrap();
        for tx in &state.subscribers {
            let _ = tx.unbounded_send(signal.clone());
        }
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn device(&self, device: &OwnedObjectPath) -> Result<FakeDevice> {
        self.state
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|d| d.path == device.as_str())
            .cloned()
            .ok_or_else(|| bus_error("unknown device"))
    }
}

fn ssid_of(profile: &ConnectionProfile) -> Option<Vec<u8>> {
    match profile.get("802-11-wireless")?.get("ssid")? {
        Value::Array(bytes) => bytes
            .iter()
            .map(|b| match b {
                Value::U8(b) => Some(*b),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn id_of(profile: &ConnectionProfile) -> String {
    match profile.get("connection").and_then(|c| c.get("id")) {
        Some(Value::Str(id)) => id.to_string(),
        _ => String::new(),
    }
}

#[async_trait]
impl NetworkBus for FakeBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::Devices);
        let state = self.state.lock().unwrap();
        Ok(state.devices.iter().map(|d| path(d.path)).collect())
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        self.device(device)?
            .device_type
            .ok_or_else(|| bus_error("no DeviceType"))
    }

    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String> {
        self.device(device)?
            .interface
            .map(str::to_string)
            .ok_or_else(|| bus_error("no Interface"))
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        self.record(Call::RequestScan(device.as_str().to_string()));
        if self.device(device)?.scan_fails {
            return Err(bus_error("scan refused"));
        }
        Ok(())
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        let device = self.device(device)?;
        if let Some(delay) = device.listing_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(device
            .access_points
            .iter()
            .map(|(p, _)| path(p))
            .collect())
    }

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<RawAccessPoint> {
        let state = self.state.lock().unwrap();
        state
            .devices
            .iter()
            .flat_map(|d| d.access_points.iter())
            .find(|(p, _)| *p == ap.as_str())
            .and_then(|(_, raw)| raw.clone())
            .ok_or_else(|| bus_error("access point vanished"))
    }

    async fn list_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::ListConnections);
        let state = self.state.lock().unwrap();
        Ok(state.profiles.iter().map(|p| p.path.clone()).collect())
    }

    async fn connection_settings(&self, profile: &OwnedObjectPath) -> Result<SettingsMap> {
        let state = self.state.lock().unwrap();
        let found = state
            .profiles
            .iter()
            .find(|p| &p.path == profile)
            .ok_or_else(|| bus_error("unknown profile"))?;

        let mut settings: SettingsMap = HashMap::new();
        let mut connection = HashMap::new();
        connection.insert(
            "id".to_string(),
            owned(Value::from(found.id.clone())),
        );
        settings.insert("connection".to_string(), connection);

        if let Some(ssid) = &found.ssid {
            let mut wireless = HashMap::new();
            wireless.insert(
                "ssid".to_string(),
                owned(Value::from(ssid.clone())),
            );
            settings.insert("802-11-wireless".to_string(), wireless);
        }
        Ok(settings)
    }

    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath> {
        let id = id_of(profile);
        self.record(Call::AddConnection(id.clone()));

        let mut state = self.state.lock().unwrap();
        if state.fail_add {
            return Err(bus_error("AddConnection rejected"));
        }
        state.next_id += 1;
        let new_path = path(&format!(
            "/org/freedesktop/NetworkManager/Settings/{}",
            100 + state.next_id
        ));
        state.profiles.push(FakeProfile {
            path: new_path.clone(),
            id,
            ssid: ssid_of(profile),
        });
        Ok(new_path)
    }

    async fn delete_connection(&self, profile: &OwnedObjectPath) -> Result<()> {
        self.record(Call::DeleteConnection(profile.as_str().to_string()));
        self.state
            .lock()
            .unwrap()
            .profiles
            .retain(|p| &p.path != profile);
        Ok(())
    }

    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        self.record(Call::Activate {
            profile: profile.as_str().to_string(),
            device: device.as_str().to_string(),
        });

        let mut state = self.state.lock().unwrap();
        if state.fail_activate {
            return Err(bus_error("ActivateConnection rejected"));
        }
        state.next_id += 1;
        let active = path(&format!(
            "/org/freedesktop/NetworkManager/ActiveConnection/{}",
            state.next_id
        ));
        state.active.push(FakeActive {
            path: active.clone(),
            profile: profile.clone(),
            devices: vec![device.clone()],
        });

        let signals: Vec<BusSignal> = state
            .on_activate
            .iter()
            .map(|emit| match emit {
                Emit::OnNew { state, reason } => BusSignal::ActiveStateChanged {
                    path: active.clone(),
                    state: *state,
                    reason: *reason,
                },
                Emit::Foreign {
                    path: other,
                    state,
                    reason,
                } => BusSignal::ActiveStateChanged {
                    path: path(other),
                    state: *state,
                    reason: *reason,
                },
            })
            .collect();

        for signal in signals {
            for tx in &state.subscribers {
                let _ = tx.unbounded_send(signal.clone());
            }
        }
        Ok(active)
    }

    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()> {
        self.record(Call::Deactivate(active.as_str().to_string()));
        let mut state = self.state.lock().unwrap();
        if state.fail_deactivate {
            return Err(bus_error("DeactivateConnection rejected"));
        }
        state.active.retain(|a| &a.path != active);
        Ok(())
    }

    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record(Call::ActiveConnections);
        let state = self.state.lock().unwrap();
        Ok(state.active.iter().map(|a| a.path.clone()).collect())
    }

    async fn active_connection_devices(
        &self,
        active: &OwnedObjectPath,
    ) -> Result<Vec<OwnedObjectPath>> {
        let state = self.state.lock().unwrap();
        state
            .active
            .iter()
            .find(|a| &a.path == active)
            .map(|a| a.devices.clone())
            .ok_or_else(|| bus_error("unknown active connection"))
    }

    async fn active_connection_profile(
        &self,
        active: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        let state = self.state.lock().unwrap();
        state
            .active
            .iter()
            .find(|a| &a.path == active)
            .map(|a| a.profile.clone())
            .ok_or_else(|| bus_error("unknown active connection"))
    }

    async fn check_connectivity(&self) -> Result<u32> {
        self.record(Call::CheckConnectivity);
        let (state, delay) = {
            let state = self.state.lock().unwrap();
            (state.connectivity, state.connectivity_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(state)
    }

    async fn subscribe_state_changes(&self, _capacity: usize) -> Result<SignalStream> {
        self.record(Call::Subscribe);
        let (tx, rx) = mpsc::unbounded();
        self.state.lock().unwrap().subscribers.push(tx);
        Ok(rx.boxed())
    }
}

/// Raw access point with the given SSID, strength and RSN flags.
pub(crate) fn raw_ap(ssid: &str, strength: u8, rsn_flags: u32) -> RawAccessPoint {
    RawAccessPoint {
        ssid: ssid.as_bytes().to_vec(),
        hw_address: format!("00:00:00:00:00:{strength:02x}"),
        frequency: 2437,
        strength,
        wpa_flags: 0,
        rsn_flags,
    }
}
