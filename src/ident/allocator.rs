//! Address allocation counters.
//!
//! Both allocators hand out strictly increasing values starting at their
//! seed. They never wrap: once the last value of the address space has been
//! returned, further calls fail with `IdentifierExhausted`.

use std::net::Ipv4Addr;

use crate::error::{Result, TopologyError};
use crate::utils::validation::normalize_mac;

/// Largest value of a 48-bit MAC address
pub const MAX_MAC: u64 = 0xffff_ffff_ffff;

/// Sequential IPv4 allocator producing `a.b.c.d/24` strings
#[derive(Debug, Clone)]
pub struct Ipv4Allocator {
    next: Option<u32>,
}

impl Ipv4Allocator {
    /// Default first address
    pub const DEFAULT_SEED: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

    pub fn new(seed: Ipv4Addr) -> Self {
        Self {
            next: Some(u32::from(seed)),
        }
    }

    /// Parse a dotted-quad seed
    pub fn from_seed(seed: &str) -> std::result::Result<Self, String> {
        seed.trim()
            .parse::<Ipv4Addr>()
            .map(Self::new)
            .map_err(|e| format!("invalid IPv4 seed '{}': {}", seed, e))
    }

    /// Return the next address in CIDR form
    pub fn next_ipv4(&mut self) -> Result<String> {
        let current = self.next.ok_or(TopologyError::IdentifierExhausted("IPv4 address"))?;
        self.next = current.checked_add(1);
        Ok(format!("{}/24", Ipv4Addr::from(current)))
    }
}

impl Default for Ipv4Allocator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// Sequential 48-bit MAC allocator
#[derive(Debug, Clone)]
pub struct MacAllocator {
    next: Option<u64>,
}

impl MacAllocator {
    pub fn new(seed: u64) -> Self {
        Self {
            next: (seed <= MAX_MAC).then_some(seed),
        }
    }

    /// Parse a colon-separated seed such as `00:00:00:00:00:00`
    pub fn from_seed(seed: &str) -> std::result::Result<Self, String> {
        let normalized = normalize_mac(seed).map_err(|e| format!("invalid MAC seed '{}': {}", seed, e))?;
        let value = u64::from_str_radix(&normalized.replace(':', ""), 16)
            .map_err(|e| format!("invalid MAC seed '{}': {}", seed, e))?;
        Ok(Self::new(value))
    }

    /// Return the next address as lowercase colon-separated hex
    pub fn next_mac(&mut self) -> Result<String> {
        let current = self.next.ok_or(TopologyError::IdentifierExhausted("MAC address"))?;
        self.next = current.checked_add(1).filter(|next| *next <= MAX_MAC);
        Ok(format_mac(current))
    }
}

impl Default for MacAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Format the low 48 bits of `value` as a MAC address
pub fn format_mac(value: u64) -> String {
    let bytes = value.to_be_bytes();
    bytes[2..]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
