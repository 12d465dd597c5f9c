//! Default node name generation.

use std::collections::HashMap;

use crate::config::NamingConfig;
use crate::topology::NodeType;

/// Per-type name counters producing `{basename}{n}`
///
/// Counters only move forward: a name freed by deletion or rename is not
/// handed out again, but every candidate is checked against the names in use
/// so a generated name never collides with an existing node.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    naming: NamingConfig,
    counters: HashMap<NodeType, u64>,
}

impl NameGenerator {
    pub fn new(naming: NamingConfig) -> Self {
        Self {
            naming,
            counters: HashMap::new(),
        }
    }

    /// Next free name for `node_type`, skipping names for which `in_use` is true
    pub fn next_name(&mut self, node_type: NodeType, in_use: impl Fn(&str) -> bool) -> String {
        let basename = self.naming.basename(node_type);
        let counter = self.counters.entry(node_type).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}{}", basename, counter);
            if !in_use(&candidate) {
                return candidate;
            }
            log::debug!("Generated name {} is taken, trying the next one", candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_counters_are_per_type() {
        let mut names = NameGenerator::default();
        assert_eq!(names.next_name(NodeType::Host, |_| false), "h1");
        assert_eq!(names.next_name(NodeType::Host, |_| false), "h2");
        assert_eq!(names.next_name(NodeType::Switch, |_| false), "s1");
        assert_eq!(names.next_name(NodeType::OVSwitch, |_| false), "ovs1");
        assert_eq!(names.next_name(NodeType::Vm, |_| false), "vm1");
        assert_eq!(names.next_name(NodeType::Controller, |_| false), "c1");
    }

    #[test]
    fn test_skips_names_in_use() {
        let taken: HashSet<&str> = ["h1", "h2", "h4"].into_iter().collect();
        let mut names = NameGenerator::default();
        assert_eq!(names.next_name(NodeType::Host, |n| taken.contains(n)), "h3");
        assert_eq!(names.next_name(NodeType::Host, |n| taken.contains(n)), "h5");
    }

    #[test]
    fn test_freed_names_are_not_reused() {
        let mut names = NameGenerator::default();
        assert_eq!(names.next_name(NodeType::Host, |_| false), "h1");
        // h1 was deleted in the meantime; the counter still moves on
        assert_eq!(names.next_name(NodeType::Host, |_| false), "h2");
    }
}
