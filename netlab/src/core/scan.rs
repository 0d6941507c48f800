//! Wi-Fi scanning across wireless devices.
//!
//! A scan requests fresh results from every matching device and classifies
//! each access point it reports. Failures on one device or access point are
//! logged and skipped; they never fail the scan as a whole.

use std::pin::pin;

use futures::{FutureExt, select};
use futures_timer::Delay;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::config::WifiConfig;
use crate::api::models::{AccessPoint, ConnectionError, ScanRequest};
use crate::bus::NetworkBus;
use crate::core::classify::classify_access_point;
use crate::core::validation::scan_deadline;
use crate::types::constants::device_type;

/// Scans and returns the visible access points, strongest first.
///
/// If the deadline elapses mid-scan, whatever was gathered so far is
/// returned.
pub(crate) async fn scan(
    bus: &dyn NetworkBus,
    config: &WifiConfig,
    request: &ScanRequest,
    cancel: &CancellationToken,
) -> Result<Vec<AccessPoint>> {
    let deadline = scan_deadline(request.max_duration, config)?;
    let mut found = Vec::new();

    {
        let mut gather =
            pin!(collect_access_points(bus, request.interface.as_deref(), &mut found).fuse());
        let mut timeout_delay = pin!(Delay::new(deadline).fuse());
        let mut cancelled = pin!(cancel.cancelled().fuse());

        select! {
            res = gather => res?,
            _ = timeout_delay => {
                warn!("Scan deadline of {deadline:?} elapsed; returning partial results");
            }
            _ = cancelled => return Err(ConnectionError::Cancelled),
        }
    }

    found.sort_by(|a, b| b.rssi.cmp(&a.rssi));
    info!("Scan found {} access points", found.len());
    Ok(found)
}

async fn collect_access_points(
    bus: &dyn NetworkBus,
    interface: Option<&str>,
    found: &mut Vec<AccessPoint>,
) -> Result<()> {
    for device in bus.devices().await? {
        if !is_scan_target(bus, &device, interface).await {
            continue;
        }

        if let Err(e) = bus.request_scan(&device).await {
            warn!("Scan request failed on {}: {e}", device.as_str());
            continue;
        }

        let aps = match bus.access_points(&device).await {
            Ok(aps) => aps,
            Err(e) => {
                warn!("Could not list access points on {}: {e}", device.as_str());
                continue;
            }
        };

        for ap in aps {
            match bus.access_point(&ap).await {
                Ok(raw) => found.push(classify_access_point(&raw)),
                Err(e) => warn!("Skipping access point {}: {e}", ap.as_str()),
            }
        }
    }

    Ok(())
}

/// A device is scanned if it is Wi-Fi and matches the interface filter.
async fn is_scan_target(
    bus: &dyn NetworkBus,
    device: &OwnedObjectPath,
    interface: Option<&str>,
) -> bool {
    let kind = match bus.device_type(device).await {
        Ok(kind) => kind,
        Err(e) => {
            debug!("Skipping {}: no device type: {e}", device.as_str());
            return false;
        }
    };

    let name = match bus.device_interface(device).await {
        Ok(name) => name,
        Err(e) => {
            debug!("Skipping {}: no interface name: {e}", device.as_str());
            return false;
        }
    };

    if interface.is_some_and(|wanted| wanted != name) {
        return false;
    }

    kind == device_type::WIFI
}
