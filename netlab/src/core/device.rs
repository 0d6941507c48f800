//! Wireless device selection.

use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::ConnectionError;
use crate::bus::NetworkBus;
use crate::types::constants::device_type;

/// Picks the device a workflow should run on.
///
/// With an interface name, the Wi-Fi device whose interface matches exactly
/// is returned. Without one, the first Wi-Fi device wins. Devices whose
/// properties cannot be read are skipped.
pub(crate) async fn find_wifi_device(
    bus: &dyn NetworkBus,
    interface: Option<&str>,
) -> Result<OwnedObjectPath> {
    let devices = bus.devices().await?;

    for device in devices {
        match interface {
            Some(wanted) => match bus.device_interface(&device).await {
                Ok(name) if name == wanted => match bus.device_type(&device).await {
                    Ok(device_type::WIFI) => {
                        debug!("Using {} for interface {wanted}", device.as_str());
                        return Ok(device);
                    }
                    Ok(other) => debug!("Interface {wanted} is not Wi-Fi (type {other})"),
                    Err(e) => warn!("Skipping {}: no device type: {e}", device.as_str()),
                },
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: no interface name: {e}", device.as_str()),
            },
            None => match bus.device_type(&device).await {
                Ok(device_type::WIFI) => {
                    debug!("Using Wi-Fi device {}", device.as_str());
                    return Ok(device);
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping {}: no device type: {e}", device.as_str()),
            },
        }
    }

    Err(match interface {
        Some(name) => ConnectionError::InterfaceNotFound(name.to_string()),
        None => ConnectionError::NoWifiDevice,
    })
}
