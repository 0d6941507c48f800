//! Hotspot (access point) bring-up and teardown.
//!
//! Starting a hotspot always replaces any saved profile with the same SSID,
//! frees the target device from whatever it is running, and only reports
//! success once the active connection created from the new profile is up.

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::build_hotspot_connection;
use crate::api::config::WifiConfig;
use crate::api::models::{ConnectionError, HotspotRequest};
use crate::bus::NetworkBus;
use crate::core::connection::release_on_cancel;
use crate::core::connection_settings::{delete_profiles_by_ssid, find_profiles_by_ssid};
use crate::core::device::find_wifi_device;
use crate::core::state_wait::{ProfileActivation, await_activation};
use crate::core::validation::{validate_passphrase, validate_ssid};

/// Brings up a WPA2 hotspot and waits until NetworkManager reports it active.
pub(crate) async fn start_hotspot(
    bus: &dyn NetworkBus,
    config: &WifiConfig,
    request: &HotspotRequest,
    cancel: &CancellationToken,
) -> Result<()> {
    validate_ssid(&request.ssid)?;
    validate_passphrase(&request.passphrase)?;

    let ssid = request.ssid.as_str();

    let removed = delete_profiles_by_ssid(bus, ssid).await?;
    if removed > 0 {
        debug!("Replaced {removed} existing profile(s) for '{ssid}'");
    }

    let device = find_wifi_device(bus, request.interface.as_deref()).await?;

    let profile = build_hotspot_connection(request, &config.hotspot);
    let profile_path = bus
        .add_connection(&profile)
        .await
        .inspect_err(|e| error!("Failed to save hotspot profile '{ssid}': {e}"))?;
    debug!("Hotspot profile saved at {}", profile_path.as_str());

    deactivate_on_device(bus, &device).await;

    let signals = bus.subscribe_state_changes(config.signal_capacity).await?;
    let active = bus
        .activate_connection(&profile_path, &device)
        .await
        .inspect_err(|e| error!("Failed to activate hotspot '{ssid}': {e}"))?;

    let matcher = ProfileActivation::new(bus, &profile_path);
    let outcome = await_activation(signals, &matcher, config.hotspot_timeout, cancel).await;
    let outcome = release_on_cancel(bus, &active, outcome).await;

    if outcome.is_ok() {
        info!("Hotspot '{ssid}' is up on {}", device.as_str());
    }
    outcome
}

/// Deactivates every active connection using `device`.
///
/// Best-effort: nothing here can fail the caller.
async fn deactivate_on_device(bus: &dyn NetworkBus, device: &OwnedObjectPath) {
    let active = match bus.active_connections().await {
        Ok(active) => active,
        Err(e) => {
            warn!("Could not list active connections: {e}");
            return;
        }
    };

    for conn in active {
        let devices = match bus.active_connection_devices(&conn).await {
            Ok(devices) => devices,
            Err(e) => {
                warn!("Could not read devices of {}: {e}", conn.as_str());
                continue;
            }
        };

        if !devices.contains(device) {
            continue;
        }

        match bus.deactivate_connection(&conn).await {
            Ok(()) => debug!("Deactivated {} on {}", conn.as_str(), device.as_str()),
            Err(e) => warn!("Failed to deactivate {}: {e}", conn.as_str()),
        }
    }
}

/// Tears down the hotspot for `ssid`.
///
/// Every active connection running one of the SSID's profiles is
/// deactivated. With `delete_profile`, the profiles are removed as well.
pub(crate) async fn stop_hotspot(
    bus: &dyn NetworkBus,
    ssid: &str,
    delete_profile: bool,
) -> Result<()> {
    validate_ssid(ssid)?;

    let profiles = find_profiles_by_ssid(bus, ssid).await?;
    if profiles.is_empty() {
        return Err(ConnectionError::NoSavedConnection);
    }

    for active in bus.active_connections().await? {
        match bus.active_connection_profile(&active).await {
            Ok(profile) if profiles.contains(&profile) => {
                bus.deactivate_connection(&active).await?;
                debug!("Deactivated hotspot connection {}", active.as_str());
            }
            Ok(_) => {}
            Err(e) => warn!("Could not resolve profile of {}: {e}", active.as_str()),
        }
    }

    if delete_profile {
        for profile in &profiles {
            bus.delete_connection(profile).await?;
        }
    }

    info!("Hotspot '{ssid}' stopped");
    Ok(())
}
