//! Identifier generation for newly created nodes.
//!
//! This module produces default node names, IPv4 addresses and MAC
//! addresses. The counters belong to a single graph, so independent graphs
//! never share state, and nothing here is persisted: a loaded topology keeps
//! its literal address strings and the counters start again from their seeds.

pub mod allocator;
pub mod names;

pub use allocator::{format_mac, Ipv4Allocator, MacAllocator};
pub use names::NameGenerator;

use crate::config::{ConfigError, EditorConfig};
use crate::error::Result;
use crate::topology::NodeType;

/// Bundle of the three generators owned by a graph
#[derive(Debug, Clone, Default)]
pub struct IdentifierGenerators {
    names: NameGenerator,
    ipv4: Ipv4Allocator,
    mac: MacAllocator,
}

impl IdentifierGenerators {
    /// Build generators from editor settings
    pub fn from_config(config: &EditorConfig) -> Result<Self, ConfigError> {
        let ipv4 = Ipv4Allocator::from_seed(&config.addresses.ipv4_seed)
            .map_err(ConfigError::InvalidAddresses)?;
        let mac =
            MacAllocator::from_seed(&config.addresses.mac_seed).map_err(ConfigError::InvalidAddresses)?;
        Ok(Self {
            names: NameGenerator::new(config.naming.clone()),
            ipv4,
            mac,
        })
    }

    pub fn next_name(&mut self, node_type: NodeType, in_use: impl Fn(&str) -> bool) -> String {
        self.names.next_name(node_type, in_use)
    }

    pub fn next_ipv4(&mut self) -> Result<String> {
        self.ipv4.next_ipv4()
    }

    pub fn next_mac(&mut self) -> Result<String> {
        self.mac.next_mac()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_follow_config_seeds() {
        let mut config = EditorConfig::default();
        config.addresses.ipv4_seed = "10.1.0.7".to_string();
        config.addresses.mac_seed = "02:00:00:00:00:10".to_string();
        config.naming.host = "node".to_string();

        let mut ids = IdentifierGenerators::from_config(&config).unwrap();
        assert_eq!(ids.next_ipv4().unwrap(), "10.1.0.7/24");
        assert_eq!(ids.next_mac().unwrap(), "02:00:00:00:00:10");
        assert_eq!(ids.next_name(NodeType::Host, |_| false), "node1");
    }

    #[test]
    fn test_independent_generators_do_not_share_counters() {
        let mut a = IdentifierGenerators::default();
        let mut b = IdentifierGenerators::default();
        assert_eq!(a.next_ipv4().unwrap(), "192.168.0.1/24");
        assert_eq!(a.next_ipv4().unwrap(), "192.168.0.2/24");
        assert_eq!(b.next_ipv4().unwrap(), "192.168.0.1/24");
    }
}
