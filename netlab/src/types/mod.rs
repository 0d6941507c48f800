//! Type definitions and constants.
//!
//! This module contains NetworkManager constants used across the crate.

pub(crate) mod constants;
