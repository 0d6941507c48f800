//! Request validation, run before any bus call.

use std::time::Duration;

use crate::Result;
use crate::api::config::WifiConfig;
use crate::api::models::{ConnectionError, ConnectionSecret};

const MAX_SSID_BYTES: usize = 32;
const MIN_PASSPHRASE_LEN: usize = 8;
const MAX_PASSPHRASE_LEN: usize = 63;
const RAW_PSK_HEX_LEN: usize = 64;

/// An SSID is 1 to 32 arbitrary bytes.
pub(crate) fn validate_ssid(ssid: &str) -> Result<()> {
    if ssid.is_empty() {
        return Err(ConnectionError::InvalidSsid("SSID is empty".into()));
    }
    if ssid.len() > MAX_SSID_BYTES {
        return Err(ConnectionError::InvalidSsid(format!(
            "'{ssid}' is {} bytes, at most {MAX_SSID_BYTES} allowed",
            ssid.len()
        )));
    }
    Ok(())
}

/// WPA passphrase: 8-63 ASCII characters, or a raw 64-digit hex key.
pub(crate) fn validate_passphrase(psk: &str) -> Result<()> {
    if psk.len() == RAW_PSK_HEX_LEN {
        return if psk.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(())
        } else {
            Err(ConnectionError::InvalidPassphrase(
                "64-character keys must be hexadecimal".into(),
            ))
        };
    }

    if !psk.is_ascii() {
        return Err(ConnectionError::InvalidPassphrase(
            "passphrase must be ASCII".into(),
        ));
    }

    if !(MIN_PASSPHRASE_LEN..=MAX_PASSPHRASE_LEN).contains(&psk.len()) {
        return Err(ConnectionError::InvalidPassphrase(format!(
            "length {} is outside {MIN_PASSPHRASE_LEN}..={MAX_PASSPHRASE_LEN}",
            psk.len()
        )));
    }

    Ok(())
}

/// Checks the variant-specific invariants of a secret.
pub(crate) fn validate_secret(secret: &ConnectionSecret) -> Result<()> {
    match secret {
        ConnectionSecret::Open { confirmed: true } => Ok(()),
        ConnectionSecret::Open { confirmed: false } => Err(ConnectionError::InvalidSecret),
        ConnectionSecret::Passphrase { psk } => validate_passphrase(psk),
        ConnectionSecret::Enterprise(eap) if eap.identity.is_empty() => {
            Err(ConnectionError::InvalidSecret)
        }
        ConnectionSecret::Enterprise(_) => Ok(()),
    }
}

/// Resolves the effective scan deadline: zero means the configured default.
pub(crate) fn scan_deadline(requested: Duration, config: &WifiConfig) -> Result<Duration> {
    if requested.is_zero() {
        return Ok(config.scan_default);
    }
    if requested > config.scan_cap {
        return Err(ConnectionError::InvalidScanDuration {
            requested,
            cap: config.scan_cap,
        });
    }
    Ok(requested)
}
