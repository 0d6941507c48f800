//! Public API module.
//!
//! This module contains the high-level user-facing API for the `netlab` crate.

pub mod builders;
pub mod config;
pub mod models;
pub mod network_manager;
