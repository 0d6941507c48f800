//! Orchestration workflows.
//!
//! Everything in here talks to NetworkManager through
//! [`NetworkBus`](crate::NetworkBus) only, so the workflows run unchanged
//! against the system bus or a test double.

pub(crate) mod classify;
pub(crate) mod connection;
pub(crate) mod connection_settings;
pub(crate) mod connectivity;
pub(crate) mod device;
pub(crate) mod hotspot;
pub(crate) mod scan;
pub(crate) mod state_wait;
pub(crate) mod validation;

#[cfg(test)]
pub(crate) mod testing;
