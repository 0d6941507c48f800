//! Saved connection profile lookup and removal.

use log::{debug, warn};
use zvariant::{OwnedObjectPath, Value};

use crate::Result;
use crate::bus::{NetworkBus, SettingsMap};
use crate::types::constants::settings;

/// Reads the wireless SSID out of a profile's settings.
///
/// Returns `None` for non-wireless profiles.
pub(crate) fn profile_ssid(profile: &SettingsMap) -> Option<Vec<u8>> {
    let ssid = profile.get(settings::WIRELESS)?.get("ssid")?;
    match &**ssid {
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

/// Paths of all saved profiles whose wireless SSID equals `ssid`.
///
/// Profiles whose settings cannot be read are skipped.
pub(crate) async fn find_profiles_by_ssid(
    bus: &dyn NetworkBus,
    ssid: &str,
) -> Result<Vec<OwnedObjectPath>> {
    let mut matches = Vec::new();

    for profile in bus.list_connections().await? {
        let settings = match bus.connection_settings(&profile).await {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping profile {}: {e}", profile.as_str());
                continue;
            }
        };

        if profile_ssid(&settings).as_deref() == Some(ssid.as_bytes()) {
            matches.push(profile);
        }
    }

    Ok(matches)
}

/// Deletes every saved profile for `ssid`. Individual delete failures are
/// logged and do not stop the sweep.
///
/// Returns how many profiles were removed.
pub(crate) async fn delete_profiles_by_ssid(bus: &dyn NetworkBus, ssid: &str) -> Result<usize> {
    let mut deleted = 0;

    for profile in find_profiles_by_ssid(bus, ssid).await? {
        match bus.delete_connection(&profile).await {
            Ok(()) => {
                debug!("Deleted stale profile {} for '{ssid}'", profile.as_str());
                deleted += 1;
            }
            Err(e) => warn!("Failed to delete profile {}: {e}", profile.as_str()),
        }
    }

    Ok(deleted)
}
