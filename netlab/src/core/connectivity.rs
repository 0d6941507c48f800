//! Internet reachability check.

use std::pin::pin;
use std::time::Duration;

use futures::{FutureExt, select};
use futures_timer::Delay;
use log::{debug, warn};

use crate::Result;
use crate::api::config::WifiConfig;
use crate::api::models::{ConnectionError, Connectivity};
use crate::bus::NetworkBus;

/// Has NetworkManager re-run its connectivity check and reports the result.
///
/// A zero `timeout` falls back to the configured default. The check itself
/// keeps running inside NetworkManager if the deadline wins.
pub(crate) async fn check_connectivity(
    bus: &dyn NetworkBus,
    config: &WifiConfig,
    timeout: Duration,
) -> Result<Connectivity> {
    let deadline = if timeout.is_zero() {
        config.connectivity_timeout
    } else {
        timeout
    };

    let mut check = pin!(bus.check_connectivity().fuse());
    let mut timeout_delay = pin!(Delay::new(deadline).fuse());

    select! {
        res = check => {
            let state = Connectivity::from(res?);
            debug!("Connectivity is {state}");
            Ok(state)
        }
        _ = timeout_delay => {
            warn!("Connectivity check gave no answer within {deadline:?}");
            Err(ConnectionError::ConnectivityTimeout(deadline))
        }
    }
}
