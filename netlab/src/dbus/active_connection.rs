//! `org.freedesktop.NetworkManager.Connection.Active`.

use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// An active connection is the live instance of a settings profile on one or
/// more devices. Its path differs from the profile's path; `Connection` links
/// back to the profile.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// `NMActiveConnectionState`; see [`ActivationState`](crate::ActivationState).
    #[zbus(property)]
    fn state(&self) -> Result<u32>;

    /// Settings profile this connection was activated from.
    #[zbus(property)]
    fn connection(&self) -> Result<OwnedObjectPath>;

    #[zbus(property)]
    fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// `(state, reason)` on every transition. Renamed so it does not clash
    /// with the change stream generated for the `state` property.
    #[zbus(signal, name = "StateChanged")]
    fn activation_state_changed(&self, state: u32, reason: u32);
}
