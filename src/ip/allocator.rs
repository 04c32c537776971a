//! Host address allocation.
//!
//! Hosts receive pseudo-random, globally unique 32-bit addresses drawn from
//! the full IPv4 space. Addresses are handed out in draw order, in blocks of
//! `addresses_per_host`, following host creation order.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use crate::topology::Topology;

/// Size of the IPv4 address space
const ADDRESS_SPACE: u64 = 1 << 32;

/// Errors that can occur during address allocation
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("addresses_per_host must be at least 1")]
    NoAddressesPerHost,

    #[error("Cannot allocate {requested} unique addresses from a 32-bit space")]
    SpaceExhausted { requested: u64 },
}

/// Host name -> ordered list of assigned addresses
#[derive(Debug, Clone, Default)]
pub struct HostAddressMap {
    addresses: HashMap<String, Vec<u32>>,
}

impl HostAddressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses of a host; empty if the host has none
    pub fn get(&self, host: &str) -> &[u32] {
        self.addresses.get(host).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, host: &str, addresses: Vec<u32>) {
        self.addresses.insert(host.to_string(), addresses);
    }

    /// Number of hosts with addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Total number of assigned addresses
    pub fn total(&self) -> usize {
        self.addresses.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<u32>)> {
        self.addresses.iter()
    }
}

/// Build the RNG used for address draws; a seed makes runs reproducible
pub fn address_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Assign `addresses_per_host` unique addresses to every host of the topology
pub fn assign_host_addresses<R: Rng>(
    topology: &Topology,
    addresses_per_host: usize,
    rng: &mut R,
) -> Result<HostAddressMap, AddressError> {
    if addresses_per_host == 0 {
        return Err(AddressError::NoAddressesPerHost);
    }

    let target = topology.host_count() * addresses_per_host;
    if target as u64 > ADDRESS_SPACE {
        return Err(AddressError::SpaceExhausted { requested: target as u64 });
    }

    // Rejection sampling; the Vec keeps draw order for the partitioning
    let mut seen = HashSet::with_capacity(target);
    let mut pool = Vec::with_capacity(target);
    while pool.len() < target {
        let addr: u32 = rng.gen();
        if seen.insert(addr) {
            pool.push(addr);
        }
    }

    let mut map = HostAddressMap::new();
    let mut assigned = 0;
    for (host, chunk) in topology.hosts().zip(pool.chunks(addresses_per_host)) {
        assert_eq!(chunk.len(), addresses_per_host, "short address block for {}", host.name);
        map.insert(&host.name, chunk.to_vec());
        assigned += chunk.len();
    }
    assert_eq!(assigned, target, "assigned address count does not match host demand");

    log::debug!("Assigned {} addresses to {} hosts", assigned, map.len());
    Ok(map)
}
