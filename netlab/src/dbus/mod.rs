//! D-Bus proxy interfaces for NetworkManager.
//!
//! Low-level proxy definitions plus [`SystemBus`], the production
//! [`NetworkBus`](crate::NetworkBus).
//!
//! # NetworkManager D-Bus Structure
//!
//! - `/org/freedesktop/NetworkManager` - Main NM object
//! - `/org/freedesktop/NetworkManager/Devices/*` - Device objects
//! - `/org/freedesktop/NetworkManager/AccessPoint/*` - Access point objects
//! - `/org/freedesktop/NetworkManager/ActiveConnection/*` - Active connection objects
//! - `/org/freedesktop/NetworkManager/Settings/*` - Saved profiles

mod access_point;
mod active_connection;
mod device;
mod main_nm;
mod settings;
mod system_bus;
mod wireless;

pub(crate) use access_point::NMAccessPointProxy;
pub(crate) use active_connection::NMActiveConnectionProxy;
pub(crate) use device::NMDeviceProxy;
pub(crate) use main_nm::NMProxy;
pub(crate) use settings::{NMSettingsConnectionProxy, NMSettingsProxy};
pub(crate) use wireless::NMWirelessProxy;

pub use system_bus::SystemBus;
