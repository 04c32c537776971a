//! IP address allocation module.
//!
//! This module hands out the per-host address blocks used by the route
//! builder when it expands host-pair paths into address-pair flow entries.

pub mod allocator;

// Re-export commonly used types
pub use allocator::{address_rng, assign_host_addresses, AddressError, HostAddressMap};
