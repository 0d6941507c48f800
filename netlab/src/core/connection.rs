//! Client connection workflow.
//!
//! The flow:
//! 1. Validate the SSID and secret
//! 2. Find the first Wi-Fi device
//! 3. Build and save an infrastructure profile for the secret variant
//! 4. Subscribe to state changes, then activate the profile on the device
//! 5. Wait for the activation to settle

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::build_client_connection;
use crate::api::config::WifiConfig;
use crate::api::models::{ConnectionError, ConnectionSecret};
use crate::bus::NetworkBus;
use crate::core::device::find_wifi_device;
use crate::core::state_wait::{AnyActivation, await_activation};
use crate::core::validation::{validate_secret, validate_ssid};

/// Connects to a Wi-Fi network with the given secret.
pub(crate) async fn connect(
    bus: &dyn NetworkBus,
    config: &WifiConfig,
    ssid: &str,
    secret: &ConnectionSecret,
    cancel: &CancellationToken,
) -> Result<()> {
    validate_ssid(ssid)?;
    validate_secret(secret)?;

    debug!(
        "Connecting to '{ssid}' | secured={} is_psk={} is_eap={}",
        secret.secured(),
        secret.is_psk(),
        secret.is_eap()
    );

    let device = find_wifi_device(bus, None).await?;

    let profile = build_client_connection(ssid, secret);
    let profile_path = bus
        .add_connection(&profile)
        .await
        .inspect_err(|e| error!("Failed to save profile for '{ssid}': {e}"))?;

    let signals = bus.subscribe_state_changes(config.signal_capacity).await?;
    let active = bus
        .activate_connection(&profile_path, &device)
        .await
        .inspect_err(|e| error!("Failed to activate '{ssid}': {e}"))?;
    debug!("Activation started: {}", active.as_str());

    let outcome = await_activation(signals, &AnyActivation, config.connect_timeout, cancel).await;
    let outcome = release_on_cancel(bus, &active, outcome).await;

    if outcome.is_ok() {
        info!("Connected to '{ssid}'");
    }
    outcome
}

/// Deactivates `active` if the wait was cancelled, then passes the outcome
/// through. Deactivation failures are only logged.
pub(crate) async fn release_on_cancel(
    bus: &dyn NetworkBus,
    active: &OwnedObjectPath,
    outcome: Result<()>,
) -> Result<()> {
    if matches!(outcome, Err(ConnectionError::Cancelled)) {
        debug!("Cancelled; deactivating {}", active.as_str());
        if let Err(e) = bus.deactivate_connection(active).await {
            warn!("Failed to deactivate {} after cancel: {e}", active.as_str());
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::EapConfig;
    use crate::core::testing::{Call, Emit, FakeBus, FakeDevice};
    use std::time::Duration;

    fn wifi_bus() -> FakeBus {
        FakeBus::new()
            .with_device(FakeDevice::ethernet("/dev/1", "eth0"))
            .with_device(FakeDevice::wifi("/dev/2", "wlan0"))
    }

    fn psk() -> ConnectionSecret {
        ConnectionSecret::Passphrase {
            psk: "hunter2hunter2".into(),
        }
    }

    #[tokio::test]
    async fn unconfirmed_open_secret_makes_no_bus_calls() {
        let bus = wifi_bus();
        let result = connect(
            &bus,
            &WifiConfig::default(),
            "Cafe",
            &ConnectionSecret::Open { confirmed: false },
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::InvalidSecret)));
        assert!(bus.calls().is_empty());
    }

    #[tokio::test]
    async fn activated_signal_completes_connect() {
        let bus = wifi_bus().on_activate(vec![
            Emit::OnNew { state: 1, reason: 0 },
            Emit::OnNew { state: 2, reason: 0 },
        ]);

        connect(
            &bus,
            &WifiConfig::default(),
            "Home",
            &psk(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let calls = bus.calls();
        let subscribe = calls.iter().position(|c| *c == Call::Subscribe).unwrap();
        let activate = calls
            .iter()
            .position(|c| matches!(c, Call::Activate { .. }))
            .unwrap();
        assert!(subscribe < activate);
        assert!(calls.contains(&Call::Activate {
            profile: "/org/freedesktop/NetworkManager/Settings/101".into(),
            device: "/dev/2".into(),
        }));
        assert_eq!(bus.open_subscriptions(), 0);
    }

    #[tokio::test]
    async fn deactivated_signal_fails_connect() {
        // 10 = LoginFailed
        let bus = wifi_bus().on_activate(vec![Emit::OnNew { state: 4, reason: 10 }]);
        let secret = ConnectionSecret::Enterprise(EapConfig::new("alice", "wrong"));

        let result = connect(
            &bus,
            &WifiConfig::default(),
            "Corp",
            &secret,
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::AuthFailed)));
    }

    #[tokio::test]
    async fn silence_times_out_and_releases_subscription() {
        let bus = wifi_bus();
        let config = WifiConfig::default().with_connect_timeout(Duration::from_millis(50));

        let result = connect(&bus, &config, "Home", &psk(), &CancellationToken::new()).await;

        assert!(matches!(result, Err(ConnectionError::Timeout)));
        assert_eq!(bus.open_subscriptions(), 0);
        // Timeouts leave the activation alone.
        assert!(!bus.calls().iter().any(|c| matches!(c, Call::Deactivate(_))));
    }

    #[tokio::test]
    async fn cancel_deactivates_created_connection() {
        let bus = wifi_bus();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = connect(&bus, &WifiConfig::default(), "Home", &psk(), &cancel).await;

        assert!(matches!(result, Err(ConnectionError::Cancelled)));
        assert!(bus.calls().iter().any(|c| matches!(c, Call::Deactivate(_))));
        assert!(bus.active().is_empty());
    }

    #[tokio::test]
    async fn missing_wifi_device_creates_nothing() {
        let bus = FakeBus::new().with_device(FakeDevice::ethernet("/dev/1", "eth0"));

        let result = connect(
            &bus,
            &WifiConfig::default(),
            "Home",
            &psk(),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::NoWifiDevice)));
        assert!(bus.profiles().is_empty());
    }

    #[tokio::test]
    async fn activation_call_failure_propagates() {
        let bus = wifi_bus().failing_activate();

        let result = connect(
            &bus,
            &WifiConfig::default(),
            "Home",
            &psk(),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(ConnectionError::Dbus(_))));
    }
}
