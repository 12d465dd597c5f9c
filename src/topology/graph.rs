//! The editable topology graph.
//!
//! Nodes are addressed by name from the outside and by a stable [`NodeId`]
//! inside, so a rename touches only the name index. Every public mutation
//! checks all of its preconditions before changing anything; on error the
//! graph is exactly as it was.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::{debug, warn};

use crate::config::{ConfigError, EditorConfig};
use crate::error::{RejectReason, Result, TopologyError};
use crate::ident::IdentifierGenerators;
use crate::topology::connections::{can_connect, is_controller_link};
use crate::topology::events::{GraphEvent, Listener, Listeners};
use crate::topology::types::{
    AttributeEdit, ControllerAttributes, Edge, EdgeKey, HostAttributes, HostInterface,
    InterfaceBinding, Node, NodeAttributes, NodeId, NodeType, OvSwitchAttributes, Position,
    VmAttributes, VmInterface,
};
use crate::utils::paths::is_plain_file_name;

/// Borrowed view of an edge with its endpoints resolved
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub u: &'a Node,
    pub v: &'a Node,
    pub binding: InterfaceBinding,
}

impl<'a> EdgeView<'a> {
    /// MAC of the interface bound on the `u` side
    pub fn u_interface_mac(&self) -> Option<&'a str> {
        self.binding.u.and_then(|i| self.u.attributes().interface_mac(i))
    }

    /// MAC of the interface bound on the `v` side
    pub fn v_interface_mac(&self) -> Option<&'a str> {
        self.binding.v.and_then(|i| self.v.attributes().interface_mac(i))
    }

    pub fn involves(&self, name: &str) -> bool {
        self.u.name() == name || self.v.name() == name
    }

    pub fn is_controller_link(&self) -> bool {
        is_controller_link(self.u.node_type(), self.v.node_type())
    }
}

/// Controller edge that a connect will delete first
#[derive(Debug, Clone, PartialEq)]
struct ReplacedController {
    ovswitch: NodeId,
    controller: NodeId,
    name: String,
}

/// A validated connect request that has not been committed
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectPlan {
    u: NodeId,
    v: NodeId,
    binding: InterfaceBinding,
    replaced: Option<ReplacedController>,
}

impl ConnectPlan {
    pub fn binding(&self) -> InterfaceBinding {
        self.binding
    }

    /// Controller whose link would be removed to make room for this one
    pub fn replaced_controller(&self) -> Option<&str> {
        self.replaced.as_ref().map(|r| r.name.as_str())
    }
}

/// Result of a committed connect
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOutcome {
    pub binding: InterfaceBinding,
    /// Set when an OVSwitch dropped its previous controller link
    pub replaced_controller: Option<String>,
}

/// Mutable graph of typed nodes and links
#[derive(Debug)]
pub struct TopologyGraph {
    nodes: BTreeMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
    edges: BTreeMap<u64, Edge>,
    edge_index: HashMap<EdgeKey, u64>,
    next_node_id: u64,
    next_edge_seq: u64,
    ids: IdentifierGenerators,
    config: EditorConfig,
    listeners: Listeners,
}

impl Default for TopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyGraph {
    /// Empty graph with built-in defaults
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            names: HashMap::new(),
            edges: BTreeMap::new(),
            edge_index: HashMap::new(),
            next_node_id: 0,
            next_edge_seq: 0,
            ids: IdentifierGenerators::default(),
            config: EditorConfig::default(),
            listeners: Listeners::default(),
        }
    }

    /// Empty graph using the given editor settings
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ids = IdentifierGenerators::from_config(&config)?;
        Ok(Self {
            ids,
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Register a callback for committed changes
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Swap in another graph wholesale, keeping this graph's listeners
    pub fn replace_with(&mut self, other: TopologyGraph) {
        let listeners = std::mem::take(&mut self.listeners);
        *self = other;
        self.listeners = listeners;
        self.listeners.emit(GraphEvent::Reset);
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn get_node(&self, name: &str) -> Option<&Node> {
        self.names.get(name).and_then(|id| self.nodes.get(id))
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// All nodes in insertion order
    pub fn list_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Nodes of one type in insertion order
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values().filter(move |n| n.node_type() == node_type)
    }

    /// All edges in creation order
    pub fn list_edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.edges.values().filter_map(|edge| self.view(edge))
    }

    pub fn edge_between(&self, u: &str, v: &str) -> Option<EdgeView<'_>> {
        let u_id = *self.names.get(u)?;
        let v_id = *self.names.get(v)?;
        let seq = self.edge_index.get(&EdgeKey::new(u_id, v_id))?;
        self.edges.get(seq).and_then(|edge| self.view(edge))
    }

    /// Edges touching `name`, in creation order
    pub fn incident_edges(&self, name: &str) -> Vec<EdgeView<'_>> {
        match self.names.get(name) {
            Some(id) => self
                .edges
                .values()
                .filter(|edge| edge.touches(*id))
                .filter_map(|edge| self.view(edge))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Controller currently attached to the OVSwitch `name`
    pub fn controller_of(&self, name: &str) -> Option<&Node> {
        match self.get_node(name)?.attributes() {
            NodeAttributes::OVSwitch(attrs) => attrs.controller().and_then(|id| self.nodes.get(&id)),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn view<'a>(&'a self, edge: &Edge) -> Option<EdgeView<'a>> {
        Some(EdgeView {
            u: self.nodes.get(&edge.u)?,
            v: self.nodes.get(&edge.v)?,
            binding: edge.binding,
        })
    }

    fn lookup(&self, name: &str) -> Result<&Node> {
        self.get_node(name)
            .ok_or_else(|| TopologyError::NodeNotFound(name.to_string()))
    }

    fn name_of(&self, id: NodeId) -> String {
        self.nodes.get(&id).map(|n| n.name.clone()).unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Add a node with an optional explicit name and attributes
    ///
    /// A missing name is generated from the per-type counter; missing
    /// attributes are filled with the configured defaults and freshly
    /// generated addresses.
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        name: Option<&str>,
        attributes: Option<NodeAttributes>,
    ) -> Result<&Node> {
        self.add_node_at(node_type, name, attributes, Position::default())
    }

    /// Like [`add_node`](Self::add_node), placing the node at `position`
    pub fn add_node_at(
        &mut self,
        node_type: NodeType,
        name: Option<&str>,
        attributes: Option<NodeAttributes>,
        position: Position,
    ) -> Result<&Node> {
        check_position(position.x, position.y)?;
        let explicit_name = match name {
            Some(raw) => {
                let name = validate_name(raw)?;
                if self.names.contains_key(&name) {
                    return Err(TopologyError::DuplicateName(name));
                }
                Some(name)
            }
            None => None,
        };

        let attributes = match attributes {
            Some(attrs) => {
                if attrs.node_type() != node_type {
                    return Err(TopologyError::invalid_attribute(
                        "attributes",
                        attrs.node_type().to_string(),
                        format!("expected attributes for a {} node", node_type),
                    ));
                }
                ensure_unique_interfaces(&attrs)?;
                match attrs {
                    // The controller link is owned by the graph, never by the caller
                    NodeAttributes::OVSwitch(_) => NodeAttributes::OVSwitch(OvSwitchAttributes::default()),
                    other => other,
                }
            }
            None => self.default_attributes(node_type)?,
        };

        let name = match explicit_name {
            Some(name) => name,
            None => {
                let names = &self.names;
                self.ids.next_name(node_type, |candidate| names.contains_key(candidate))
            }
        };

        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.names.insert(name.clone(), id);
        self.nodes.insert(
            id,
            Node {
                id,
                name: name.clone(),
                attributes,
                position,
            },
        );

        debug!("Added {} node {}", node_type, name);
        self.listeners.emit(GraphEvent::NodeAdded { name });

        self.nodes
            .get(&id)
            .ok_or_else(|| TopologyError::NodeNotFound(self.name_of(id)))
    }

    /// Rename a node. Edges and controller links follow automatically.
    pub fn rename_node(&mut self, old: &str, new: &str) -> Result<()> {
        let id = self.lookup(old)?.id;
        let new_name = validate_name(new)?;
        if new_name == old {
            return Ok(());
        }
        if self.names.contains_key(&new_name) {
            return Err(TopologyError::DuplicateName(new_name));
        }

        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| TopologyError::NodeNotFound(old.to_string()))?;
        node.name = new_name.clone();
        self.names.remove(old);
        self.names.insert(new_name.clone(), id);

        debug!("Renamed node {} to {}", old, new_name);
        self.listeners.emit(GraphEvent::NodeRenamed {
            old: old.to_string(),
            new: new_name,
        });
        Ok(())
    }

    /// Remove a node and every edge touching it. Returns false if absent.
    pub fn remove_node(&mut self, name: &str) -> bool {
        let Some(&id) = self.names.get(name) else {
            return false;
        };

        let incident: Vec<EdgeKey> = self
            .edges
            .values()
            .filter(|edge| edge.touches(id))
            .map(|edge| EdgeKey::new(edge.u, edge.v))
            .collect();
        for key in incident {
            self.remove_edge(key);
        }

        self.nodes.remove(&id);
        self.names.remove(name);

        debug!("Removed node {}", name);
        self.listeners.emit(GraphEvent::NodeRemoved {
            name: name.to_string(),
        });
        true
    }

    pub fn set_position(&mut self, name: &str, x: f64, y: f64) -> Result<()> {
        let id = self.lookup(name)?.id;
        check_position(x, y)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = Position::new(x, y);
        }
        self.listeners.emit(GraphEvent::NodeUpdated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Apply a raw attribute edit to a node
    pub fn edit_attribute(&mut self, name: &str, edit: AttributeEdit) -> Result<()> {
        let node = self.lookup(name)?;
        let mut updated = node.attributes.clone();
        updated.apply(edit)?;
        ensure_unique_interfaces(&updated)?;

        let id = node.id;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes = updated;
        }
        self.listeners.emit(GraphEvent::NodeUpdated {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Append a default interface to a Host or VM, returning its index
    pub fn add_interface(&mut self, name: &str) -> Result<usize> {
        let node = self.lookup(name)?;
        let id = node.id;
        let node_type = node.node_type();

        let index = match node_type {
            NodeType::Host => {
                let ip = self.fresh_ipv4()?;
                let mac = self.fresh_mac()?;
                let iface = HostInterface::new(Some(&ip), &mac)?;
                match self.nodes.get_mut(&id).map(|n| &mut n.attributes) {
                    Some(NodeAttributes::Host(host)) => {
                        host.interfaces.push(iface);
                        host.interfaces.len() - 1
                    }
                    _ => return Err(TopologyError::NodeNotFound(name.to_string())),
                }
            }
            NodeType::Vm => {
                let mac = self.fresh_mac()?;
                match self.nodes.get_mut(&id).map(|n| &mut n.attributes) {
                    Some(NodeAttributes::Vm(vm)) => {
                        let iface_id = next_interface_id(&vm.interfaces);
                        vm.interfaces.push(VmInterface::new(&iface_id, &mac, "")?);
                        vm.interfaces.len() - 1
                    }
                    _ => return Err(TopologyError::NodeNotFound(name.to_string())),
                }
            }
            other => {
                return Err(TopologyError::invalid_attribute(
                    "interfaces",
                    name,
                    format!("{} nodes have no interfaces", other),
                ))
            }
        };

        debug!("Added interface {} to {}", index, name);
        self.listeners.emit(GraphEvent::NodeUpdated {
            name: name.to_string(),
        });
        Ok(index)
    }

    /// Remove interface `index` and renumber every binding that refers to it
    ///
    /// Bindings past `index` shift down by one; bindings to the removed
    /// interface are cleared.
    pub fn remove_interface(&mut self, name: &str, index: usize) -> Result<()> {
        let node = self.lookup(name)?;
        let id = node.id;
        let count = node.attributes.interface_count();
        if !node.has_interfaces() || index >= count {
            return Err(TopologyError::invalid_attribute(
                "interface index",
                index.to_string(),
                format!("{} has {} interface(s)", name, count),
            ));
        }

        match self.nodes.get_mut(&id).map(|n| &mut n.attributes) {
            Some(NodeAttributes::Host(host)) => {
                host.interfaces.remove(index);
            }
            Some(NodeAttributes::Vm(vm)) => {
                vm.interfaces.remove(index);
            }
            _ => return Err(TopologyError::NodeNotFound(name.to_string())),
        }

        for edge in self.edges.values_mut() {
            if let Some(slot) = edge.binding_slot_mut(id) {
                *slot = match *slot {
                    Some(bound) if bound == index => None,
                    Some(bound) if bound > index => Some(bound - 1),
                    other => other,
                };
            }
        }

        debug!("Removed interface {} from {}", index, name);
        self.listeners.emit(GraphEvent::NodeUpdated {
            name: name.to_string(),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Check a connect request without committing it
    ///
    /// Without an explicit binding, each endpoint with interfaces gets its
    /// first interface not already bound by another edge.
    pub fn plan_connect(
        &self,
        u: &str,
        v: &str,
        binding: Option<InterfaceBinding>,
    ) -> Result<ConnectPlan> {
        let u_node = self.lookup(u)?;
        let v_node = self.lookup(v)?;

        if u_node.id == v_node.id {
            return Err(TopologyError::rejected(u, v, RejectReason::SelfLoop));
        }
        if self.edge_index.contains_key(&EdgeKey::new(u_node.id, v_node.id)) {
            return Err(TopologyError::rejected(u, v, RejectReason::AlreadyConnected));
        }
        let (u_type, v_type) = (u_node.node_type(), v_node.node_type());
        if !can_connect(u_type, v_type) {
            return Err(TopologyError::rejected(
                u,
                v,
                RejectReason::IncompatibleTypes(u_type, v_type),
            ));
        }

        let binding = match binding {
            Some(binding) => {
                check_binding(u_node, binding.u)
                    .and_then(|_| check_binding(v_node, binding.v))
                    .map_err(|msg| TopologyError::rejected(u, v, RejectReason::InvalidBinding(msg)))?;
                binding
            }
            None => InterfaceBinding::new(
                self.first_free_interface(u_node.id),
                self.first_free_interface(v_node.id),
            ),
        };

        let replaced = self
            .controller_pair(u_node.id, v_node.id)
            .and_then(|(ovswitch, _)| match &self.nodes.get(&ovswitch)?.attributes {
                NodeAttributes::OVSwitch(attrs) => attrs.controller.map(|old| (ovswitch, old)),
                _ => None,
            })
            .map(|(ovswitch, controller)| ReplacedController {
                ovswitch,
                controller,
                name: self.name_of(controller),
            });

        Ok(ConnectPlan {
            u: u_node.id,
            v: v_node.id,
            binding,
            replaced,
        })
    }

    /// Link two nodes
    ///
    /// Connecting an OVSwitch that already has a controller to another
    /// controller removes the old controller link first; the outcome names
    /// the replaced controller so callers can warn about it.
    pub fn connect(
        &mut self,
        u: &str,
        v: &str,
        binding: Option<InterfaceBinding>,
    ) -> Result<ConnectOutcome> {
        let plan = self.plan_connect(u, v, binding)?;

        if let Some(replaced) = &plan.replaced {
            warn!(
                "{} already has controller {}; replacing its link",
                self.name_of(replaced.ovswitch),
                replaced.name
            );
            self.remove_edge(EdgeKey::new(replaced.ovswitch, replaced.controller));
        }

        let seq = self.next_edge_seq;
        self.next_edge_seq += 1;
        self.edges.insert(
            seq,
            Edge {
                u: plan.u,
                v: plan.v,
                binding: plan.binding,
            },
        );
        self.edge_index.insert(EdgeKey::new(plan.u, plan.v), seq);

        if let Some((ovswitch, controller)) = self.controller_pair(plan.u, plan.v) {
            if let Some(attrs) = self.ovswitch_attributes_mut(ovswitch) {
                attrs.controller = Some(controller);
            }
        }

        debug!("Connected {} and {} ({:?})", u, v, plan.binding);
        self.listeners.emit(GraphEvent::EdgeAdded {
            u: u.to_string(),
            v: v.to_string(),
        });

        Ok(ConnectOutcome {
            binding: plan.binding,
            replaced_controller: plan.replaced.map(|r| r.name),
        })
    }

    /// Remove the edge between `u` and `v`. Returns false if there is none.
    pub fn disconnect(&mut self, u: &str, v: &str) -> bool {
        let (Some(&u_id), Some(&v_id)) = (self.names.get(u), self.names.get(v)) else {
            return false;
        };
        self.remove_edge(EdgeKey::new(u_id, v_id)).is_some()
    }

    /// Rebind the interface used at `endpoint`'s side of the `u`-`v` edge
    pub fn set_binding(
        &mut self,
        u: &str,
        v: &str,
        endpoint: &str,
        index: Option<usize>,
    ) -> Result<()> {
        let u_id = self.lookup(u)?.id;
        let v_id = self.lookup(v)?.id;
        let endpoint_node = self.lookup(endpoint)?;
        let endpoint_id = endpoint_node.id;
        if endpoint_id != u_id && endpoint_id != v_id {
            return Err(TopologyError::rejected(
                u,
                v,
                RejectReason::InvalidBinding(format!("{} is not an endpoint of this link", endpoint)),
            ));
        }
        check_binding(endpoint_node, index)
            .map_err(|msg| TopologyError::rejected(u, v, RejectReason::InvalidBinding(msg)))?;

        let seq = *self.edge_index.get(&EdgeKey::new(u_id, v_id)).ok_or_else(|| {
            TopologyError::rejected(u, v, RejectReason::InvalidBinding("the nodes are not linked".into()))
        })?;
        if let Some(slot) = self
            .edges
            .get_mut(&seq)
            .and_then(|edge| edge.binding_slot_mut(endpoint_id))
        {
            *slot = index;
        }

        self.listeners.emit(GraphEvent::EdgeUpdated {
            u: u.to_string(),
            v: v.to_string(),
        });
        Ok(())
    }

    fn remove_edge(&mut self, key: EdgeKey) -> Option<Edge> {
        let seq = self.edge_index.remove(&key)?;
        let edge = self.edges.remove(&seq)?;

        if let Some((ovswitch, controller)) = self.controller_pair(edge.u, edge.v) {
            if let Some(attrs) = self.ovswitch_attributes_mut(ovswitch) {
                if attrs.controller == Some(controller) {
                    attrs.controller = None;
                }
            }
        }

        let (u, v) = (self.name_of(edge.u), self.name_of(edge.v));
        debug!("Disconnected {} and {}", u, v);
        self.listeners.emit(GraphEvent::EdgeRemoved { u, v });
        Some(edge)
    }

    /// `(ovswitch, controller)` when the two nodes form a controller link
    fn controller_pair(&self, a: NodeId, b: NodeId) -> Option<(NodeId, NodeId)> {
        let a_type = self.nodes.get(&a)?.node_type();
        let b_type = self.nodes.get(&b)?.node_type();
        match (a_type, b_type) {
            (NodeType::OVSwitch, NodeType::Controller) => Some((a, b)),
            (NodeType::Controller, NodeType::OVSwitch) => Some((b, a)),
            _ => None,
        }
    }

    fn ovswitch_attributes_mut(&mut self, id: NodeId) -> Option<&mut OvSwitchAttributes> {
        match &mut self.nodes.get_mut(&id)?.attributes {
            NodeAttributes::OVSwitch(attrs) => Some(attrs),
            _ => None,
        }
    }

    fn first_free_interface(&self, id: NodeId) -> Option<usize> {
        let count = self.nodes.get(&id)?.attributes.interface_count();
        let used: BTreeSet<usize> = self
            .edges
            .values()
            .filter_map(|edge| edge.binding_for(id))
            .collect();
        (0..count).find(|i| !used.contains(i))
    }

    // ------------------------------------------------------------------
    // Defaults and identifiers
    // ------------------------------------------------------------------

    fn default_attributes(&mut self, node_type: NodeType) -> Result<NodeAttributes> {
        Ok(match node_type {
            NodeType::Host => {
                let ip = self.fresh_ipv4()?;
                let mac = self.fresh_mac()?;
                NodeAttributes::Host(HostAttributes::new(vec![HostInterface::new(Some(&ip), &mac)?]))
            }
            NodeType::Switch => NodeAttributes::Switch,
            NodeType::Controller => {
                let defaults = &self.config.defaults.controller;
                NodeAttributes::Controller(ControllerAttributes::new(&defaults.ip, &defaults.port)?)
            }
            NodeType::OVSwitch => NodeAttributes::OVSwitch(OvSwitchAttributes::default()),
            NodeType::Vm => {
                let management_mac = self.fresh_mac()?;
                let iface_mac = self.fresh_mac()?;
                let defaults = self.config.defaults.vm.clone();
                NodeAttributes::Vm(VmAttributes::new(
                    false,
                    defaults.memory_mb,
                    defaults.vcpu,
                    defaults.disk_image,
                    &management_mac,
                    vec![VmInterface::new("eth0", &iface_mac, "")?],
                )?)
            }
        })
    }

    /// Next generated MAC not already used anywhere in the graph
    fn fresh_mac(&mut self) -> Result<String> {
        let used = self.used_macs();
        loop {
            let mac = self.ids.next_mac()?;
            if !used.contains(&mac) {
                return Ok(mac);
            }
        }
    }

    /// Next generated IPv4 address not already assigned to a host interface
    ///
    /// Addresses are compared without their prefix length.
    fn fresh_ipv4(&mut self) -> Result<String> {
        let used: HashSet<String> = self
            .nodes
            .values()
            .filter_map(|n| match &n.attributes {
                NodeAttributes::Host(host) => Some(host.interfaces()),
                _ => None,
            })
            .flatten()
            .filter_map(|iface| iface.ip().map(|ip| address_part(ip).to_string()))
            .collect();
        loop {
            let ip = self.ids.next_ipv4()?;
            if !used.contains(address_part(&ip)) {
                return Ok(ip);
            }
        }
    }

    fn used_macs(&self) -> HashSet<String> {
        let mut used = HashSet::new();
        for node in self.nodes.values() {
            match &node.attributes {
                NodeAttributes::Host(host) => {
                    used.extend(host.interfaces().iter().map(|i| i.mac().to_string()));
                }
                NodeAttributes::Vm(vm) => {
                    used.insert(vm.management_mac().to_string());
                    used.extend(vm.interfaces().iter().map(|i| i.mac().to_string()));
                }
                _ => {}
            }
        }
        used
    }

    // ------------------------------------------------------------------
    // Consistency
    // ------------------------------------------------------------------

    /// Verify the structural invariants of the graph
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.names.len() != self.nodes.len() {
            return Err(format!(
                "name index has {} entries for {} nodes",
                self.names.len(),
                self.nodes.len()
            ));
        }
        for (id, node) in &self.nodes {
            if self.names.get(&node.name) != Some(id) {
                return Err(format!("name index out of sync for {}", node.name));
            }
        }

        if self.edge_index.len() != self.edges.len() {
            return Err("edge index out of sync".to_string());
        }
        for (seq, edge) in &self.edges {
            let (Some(u), Some(v)) = (self.nodes.get(&edge.u), self.nodes.get(&edge.v)) else {
                return Err(format!("edge {} references a missing node", seq));
            };
            if edge.u == edge.v {
                return Err(format!("edge {} is a self loop on {}", seq, u.name));
            }
            if self.edge_index.get(&EdgeKey::new(edge.u, edge.v)) != Some(seq) {
                return Err(format!("duplicate edge between {} and {}", u.name, v.name));
            }
            if !can_connect(u.node_type(), v.node_type()) {
                return Err(format!("illegal edge between {} and {}", u.name, v.name));
            }
            for (node, bound) in [(u, edge.binding.u), (v, edge.binding.v)] {
                if let Some(index) = bound {
                    if index >= node.attributes.interface_count() {
                        return Err(format!(
                            "edge {}-{} binds missing interface {} of {}",
                            u.name, v.name, index, node.name
                        ));
                    }
                }
            }
        }

        for node in self.nodes_of_type(NodeType::OVSwitch) {
            let controllers: Vec<NodeId> = self
                .edges
                .values()
                .filter_map(|edge| edge.peer_of(node.id))
                .filter(|peer| {
                    self.nodes
                        .get(peer)
                        .is_some_and(|p| p.node_type() == NodeType::Controller)
                })
                .collect();
            if controllers.len() > 1 {
                return Err(format!("{} has {} controllers", node.name, controllers.len()));
            }
            let recorded = match &node.attributes {
                NodeAttributes::OVSwitch(attrs) => attrs.controller,
                _ => None,
            };
            if recorded != controllers.first().copied() {
                return Err(format!("controller back-reference of {} is stale", node.name));
            }
        }

        Ok(())
    }
}

/// Trim a user-typed name and check it can be used as a node name
///
/// VM names become export file names, so every name must also be a plain
/// file name.
fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.contains('@') || !is_plain_file_name(name) {
        return Err(TopologyError::InvalidName(raw.to_string()));
    }
    Ok(name.to_string())
}

fn address_part(ip: &str) -> &str {
    ip.split('/').next().unwrap_or(ip)
}

fn check_binding(node: &Node, index: Option<usize>) -> std::result::Result<(), String> {
    match index {
        None => Ok(()),
        Some(_) if !node.has_interfaces() => {
            Err(format!("{} nodes have no interfaces", node.node_type()))
        }
        Some(i) if i >= node.attributes.interface_count() => Err(format!(
            "{} has no interface {}",
            node.name,
            i
        )),
        Some(_) => Ok(()),
    }
}

fn check_position(x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        return Ok(());
    }
    Err(TopologyError::invalid_attribute(
        "position",
        format!("({}, {})", x, y),
        "coordinates must be finite",
    ))
}

/// Interface MACs, and VM interface IDs, are unique within a node
fn ensure_unique_interfaces(attrs: &NodeAttributes) -> Result<()> {
    if let NodeAttributes::Vm(vm) = attrs {
        let mut ids = HashSet::new();
        for iface in vm.interfaces() {
            if !ids.insert(iface.id()) {
                return Err(TopologyError::invalid_attribute(
                    "interface ID",
                    iface.id(),
                    "already used by another interface of this VM",
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    for index in 0..attrs.interface_count() {
        if let Some(mac) = attrs.interface_mac(index) {
            if !seen.insert(mac.to_ascii_lowercase()) {
                return Err(TopologyError::invalid_attribute(
                    "interface MAC",
                    mac,
                    "already used by another interface of this node",
                ));
            }
        }
    }
    Ok(())
}

/// First `ethN` not taken by an existing VM interface
fn next_interface_id(interfaces: &[VmInterface]) -> String {
    (0..)
        .map(|n| format!("eth{}", n))
        .find(|candidate| interfaces.iter().all(|i| i.id() != candidate))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::DiskImage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn graph_with(nodes: &[(NodeType, &str)]) -> TopologyGraph {
        let mut graph = TopologyGraph::new();
        for (node_type, name) in nodes {
            graph.add_node(*node_type, Some(*name), None).unwrap();
        }
        graph
    }

    fn host_with_interfaces(count: usize) -> NodeAttributes {
        let interfaces = (0..count)
            .map(|i| HostInterface::new(None, &format!("02:00:00:00:00:{:02x}", i)).unwrap())
            .collect();
        NodeAttributes::Host(HostAttributes::new(interfaces))
    }

    #[test]
    fn test_two_hosts_bind_first_interfaces() {
        let mut graph = graph_with(&[(NodeType::Host, "h1"), (NodeType::Host, "h2")]);
        let outcome = graph.connect("h1", "h2", None).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.incident_edges("h1").len(), 1);
        assert_eq!(graph.incident_edges("h2").len(), 1);
        assert_eq!(outcome.binding, InterfaceBinding::new(Some(0), Some(0)));
        assert_eq!(outcome.replaced_controller, None);
        assert!(graph.check_invariants().is_ok());
    }

    #[test]
    fn test_second_controller_replaces_first() {
        let mut graph = graph_with(&[(NodeType::Controller, "c1"), (NodeType::OVSwitch, "s1")]);
        graph.connect("s1", "c1", None).unwrap();
        assert_eq!(graph.controller_of("s1").map(Node::name), Some("c1"));

        graph.add_node(NodeType::Controller, Some("c2"), None).unwrap();
        let plan = graph.plan_connect("s1", "c2", None).unwrap();
        assert_eq!(plan.replaced_controller(), Some("c1"));

        let outcome = graph.connect("s1", "c2", None).unwrap();
        assert_eq!(outcome.replaced_controller.as_deref(), Some("c1"));
        assert_eq!(graph.controller_of("s1").map(Node::name), Some("c2"));
        assert!(graph.edge_between("s1", "c1").is_none());
        assert!(graph.edge_between("c2", "s1").is_some());
        assert_eq!(outcome.binding, InterfaceBinding::default());
        assert!(graph.check_invariants().is_ok());
    }

    #[test]
    fn test_rejections_leave_graph_untouched() {
        let mut graph = graph_with(&[(NodeType::Controller, "c1"), (NodeType::Host, "h1")]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        graph.subscribe(Box::new(move |e: &GraphEvent| sink.borrow_mut().push(e.clone())));

        let err = graph.connect("c1", "c1", None).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::ConnectionRejected { reason: RejectReason::SelfLoop, .. }
        ));
        let err = graph.connect("c1", "h1", None).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::ConnectionRejected {
                reason: RejectReason::IncompatibleTypes(NodeType::Controller, NodeType::Host),
                ..
            }
        ));

        assert_eq!(graph.edge_count(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_duplicate_edge_rejected_in_both_orientations() {
        let mut graph = graph_with(&[(NodeType::Host, "h1"), (NodeType::Switch, "s1")]);
        graph.connect("h1", "s1", None).unwrap();
        for (u, v) in [("h1", "s1"), ("s1", "h1")] {
            let err = graph.connect(u, v, None).unwrap_err();
            assert!(matches!(
                err,
                TopologyError::ConnectionRejected { reason: RejectReason::AlreadyConnected, .. }
            ));
        }
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_connect_unknown_node() {
        let mut graph = graph_with(&[(NodeType::Host, "h1")]);
        assert!(matches!(
            graph.connect("h1", "ghost", None),
            Err(TopologyError::NodeNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_duplicate_and_invalid_names() {
        let mut graph = graph_with(&[(NodeType::Host, "h1")]);
        assert!(matches!(
            graph.add_node(NodeType::Switch, Some("h1"), None),
            Err(TopologyError::DuplicateName(_))
        ));
        assert!(matches!(
            graph.add_node(NodeType::Switch, Some("  "), None),
            Err(TopologyError::InvalidName(_))
        ));
        assert!(matches!(
            graph.add_node(NodeType::Vm, Some("vm@VNF"), None),
            Err(TopologyError::InvalidName(_))
        ));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_path_like_names_rejected() {
        let mut graph = graph_with(&[(NodeType::Vm, "vm1")]);
        for name in ["../../escaped", "rack/vm1", "..", ".", "a\\b", "nul\0"] {
            assert!(
                matches!(
                    graph.add_node(NodeType::Vm, Some(name), None),
                    Err(TopologyError::InvalidName(_))
                ),
                "{:?} accepted",
                name
            );
            assert!(matches!(
                graph.rename_node("vm1", name),
                Err(TopologyError::InvalidName(_))
            ));
        }
        assert_eq!(graph.node_count(), 1);
        assert!(graph.has_node("vm1"));

        // Dots inside a name are fine
        graph.rename_node("vm1", "web.v2").unwrap();
    }

    #[test]
    fn test_non_finite_positions_rejected() {
        let mut graph = graph_with(&[(NodeType::Host, "h1")]);
        graph.set_position("h1", 3.0, 4.0).unwrap();

        for (x, y) in [(f64::NAN, 1.0), (1.0, f64::INFINITY), (f64::NEG_INFINITY, 0.0)] {
            let err = graph.set_position("h1", x, y).unwrap_err();
            assert!(matches!(err, TopologyError::InvalidAttribute { field: "position", .. }));
        }
        assert_eq!(graph.get_node("h1").unwrap().position(), Position::new(3.0, 4.0));

        assert!(graph
            .add_node_at(NodeType::Switch, None, None, Position::new(f64::NAN, 0.0))
            .is_err());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_generated_ipv4_ignores_prefix_length() {
        let mut graph = TopologyGraph::new();
        let wide = HostInterface::new(Some("192.168.0.1/16"), "02:00:00:00:00:aa").unwrap();
        graph
            .add_node(
                NodeType::Host,
                Some("legacy"),
                Some(NodeAttributes::Host(HostAttributes::new(vec![wide]))),
            )
            .unwrap();

        let name = graph.add_node(NodeType::Host, None, None).unwrap().name().to_string();
        let NodeAttributes::Host(host) = graph.get_node(&name).unwrap().attributes() else {
            panic!("expected host");
        };
        assert_eq!(host.interfaces()[0].ip(), Some("192.168.0.2/24"));
    }

    #[test]
    fn test_duplicate_vm_interface_ids_rejected() {
        let mut graph = graph_with(&[(NodeType::Vm, "vm1")]);
        assert_eq!(graph.add_interface("vm1").unwrap(), 1);

        let err = graph
            .edit_attribute("vm1", AttributeEdit::VmInterfaceId { index: 1, id: "eth0".into() })
            .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidAttribute { field: "interface ID", .. }));

        let NodeAttributes::Vm(vm) = graph.get_node("vm1").unwrap().attributes() else {
            panic!("expected VM");
        };
        let ids: Vec<&str> = vm.interfaces().iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["eth0", "eth1"]);

        // Explicit attributes are checked the same way
        let twins = vec![
            VmInterface::new("eth0", "02:00:00:00:01:01", "").unwrap(),
            VmInterface::new("eth0", "02:00:00:00:01:02", "").unwrap(),
        ];
        let attrs = VmAttributes::new(
            false,
            512,
            1,
            DiskImage::ClickOnOsv,
            "02:00:00:00:01:00",
            twins,
        )
        .unwrap();
        assert!(matches!(
            graph.add_node(NodeType::Vm, Some("vm2"), Some(NodeAttributes::Vm(attrs))),
            Err(TopologyError::InvalidAttribute { field: "interface ID", .. })
        ));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_generated_names_skip_existing() {
        let mut graph = graph_with(&[(NodeType::Host, "h1"), (NodeType::Host, "h3")]);
        assert_eq!(graph.add_node(NodeType::Host, None, None).unwrap().name(), "h2");
        assert_eq!(graph.add_node(NodeType::Host, None, None).unwrap().name(), "h4");
        assert!(graph.remove_node("h2"));
        // The counter keeps moving forward past freed names
        assert_eq!(graph.add_node(NodeType::Host, None, None).unwrap().name(), "h5");
    }

    #[test]
    fn test_rename_keeps_edges_and_controller() {
        let mut graph = graph_with(&[
            (NodeType::Controller, "c1"),
            (NodeType::OVSwitch, "s1"),
            (NodeType::Host, "h1"),
        ]);
        graph.connect("s1", "c1", None).unwrap();
        graph.connect("h1", "s1", None).unwrap();

        graph.rename_node("c1", "ctrl").unwrap();
        graph.rename_node("s1", "br0").unwrap();

        assert!(!graph.has_node("c1"));
        assert_eq!(graph.controller_of("br0").map(Node::name), Some("ctrl"));
        assert!(graph.edge_between("h1", "br0").is_some());
        assert!(graph.check_invariants().is_ok());

        assert!(matches!(
            graph.rename_node("h1", "br0"),
            Err(TopologyError::DuplicateName(_))
        ));
        assert!(matches!(
            graph.rename_node("missing", "x"),
            Err(TopologyError::NodeNotFound(_))
        ));
        assert!(graph.has_node("h1"));
        graph.rename_node("h1", "h1").unwrap();
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = graph_with(&[
            (NodeType::Controller, "c1"),
            (NodeType::OVSwitch, "s1"),
            (NodeType::Host, "h1"),
            (NodeType::Vm, "vm1"),
        ]);
        graph.connect("s1", "c1", None).unwrap();
        graph.connect("h1", "s1", None).unwrap();
        graph.connect("vm1", "s1", None).unwrap();
        graph.connect("vm1", "h1", None).unwrap();

        assert!(graph.remove_node("c1"));
        assert!(graph.controller_of("s1").is_none());
        assert!(graph.remove_node("s1"));
        assert!(graph.list_edges().all(|e| !e.involves("s1")));
        assert_eq!(graph.edge_count(), 1);
        assert!(!graph.remove_node("s1"));
        assert!(graph.check_invariants().is_ok());
    }

    #[test]
    fn test_auto_binding_prefers_free_interfaces() {
        let mut graph = TopologyGraph::new();
        graph.add_node(NodeType::Host, Some("h1"), Some(host_with_interfaces(2))).unwrap();
        graph.add_node(NodeType::Host, Some("h2"), None).unwrap();
        graph.add_node(NodeType::Host, Some("h3"), None).unwrap();
        graph.add_node(NodeType::Host, Some("h4"), None).unwrap();

        assert_eq!(graph.connect("h1", "h2", None).unwrap().binding.u, Some(0));
        assert_eq!(graph.connect("h1", "h3", None).unwrap().binding.u, Some(1));
        // Both interfaces are taken; the link is created unbound on h1's side
        assert_eq!(
            graph.connect("h4", "h1", None).unwrap().binding,
            InterfaceBinding::new(Some(0), None)
        );
    }

    #[test]
    fn test_explicit_binding_is_checked() {
        let mut graph = graph_with(&[(NodeType::Host, "h1"), (NodeType::Switch, "s1")]);
        let err = graph
            .connect("h1", "s1", Some(InterfaceBinding::new(Some(0), Some(0))))
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::ConnectionRejected { reason: RejectReason::InvalidBinding(_), .. }
        ));
        let err = graph
            .connect("h1", "s1", Some(InterfaceBinding::new(Some(5), None)))
            .unwrap_err();
        assert!(matches!(err, TopologyError::ConnectionRejected { .. }));
        assert_eq!(graph.edge_count(), 0);

        graph
            .connect("h1", "s1", Some(InterfaceBinding::new(Some(0), None)))
            .unwrap();
        graph.set_binding("h1", "s1", "h1", None).unwrap();
        assert_eq!(graph.edge_between("h1", "s1").unwrap().binding.u, None);
        assert!(graph.set_binding("h1", "s1", "s1", Some(0)).is_err());
    }

    #[test]
    fn test_remove_interface_renumbers_bindings() {
        let mut graph = TopologyGraph::new();
        graph.add_node(NodeType::Host, Some("hub"), Some(host_with_interfaces(3))).unwrap();
        for peer in ["a", "b", "c"] {
            graph.add_node(NodeType::Host, Some(peer), None).unwrap();
            graph.connect("hub", peer, None).unwrap();
        }

        graph.remove_interface("hub", 1).unwrap();

        assert_eq!(graph.edge_between("hub", "a").unwrap().binding.u, Some(0));
        assert_eq!(graph.edge_between("hub", "b").unwrap().binding.u, None);
        assert_eq!(graph.edge_between("hub", "c").unwrap().binding.u, Some(1));
        assert_eq!(graph.get_node("hub").unwrap().attributes().interface_count(), 2);
        assert_eq!(
            graph.edge_between("hub", "c").unwrap().u_interface_mac(),
            Some("02:00:00:00:00:02")
        );
        assert!(graph.check_invariants().is_ok());

        assert!(graph.remove_interface("hub", 2).is_err());
        assert!(graph.remove_interface("a", 0).is_ok());
        assert_eq!(graph.edge_between("hub", "a").unwrap().binding.v, None);
    }

    #[test]
    fn test_interfaces_only_on_hosts_and_vms() {
        let mut graph = graph_with(&[(NodeType::Switch, "s1"), (NodeType::Vm, "vm1")]);
        assert!(graph.add_interface("s1").is_err());
        assert_eq!(graph.add_interface("vm1").unwrap(), 1);
        let NodeAttributes::Vm(vm) = graph.get_node("vm1").unwrap().attributes() else {
            panic!("expected VM");
        };
        assert_eq!(vm.interfaces()[1].id(), "eth1");
        assert!(graph.remove_interface("s1", 0).is_err());
    }

    #[test]
    fn test_default_attributes_use_unique_addresses() {
        let mut graph = TopologyGraph::new();
        graph.add_node(NodeType::Host, Some("h1"), None).unwrap();
        graph.add_node(NodeType::Vm, Some("vm1"), None).unwrap();
        graph.add_node(NodeType::Controller, Some("c1"), None).unwrap();

        let NodeAttributes::Host(host) = graph.get_node("h1").unwrap().attributes() else {
            panic!("expected host");
        };
        assert_eq!(host.interfaces()[0].ip(), Some("192.168.0.1/24"));
        assert_eq!(host.interfaces()[0].mac(), "00:00:00:00:00:00");

        let NodeAttributes::Vm(vm) = graph.get_node("vm1").unwrap().attributes() else {
            panic!("expected VM");
        };
        assert_eq!(vm.management_mac(), "00:00:00:00:00:01");
        assert_eq!(vm.interfaces()[0].mac(), "00:00:00:00:00:02");
        assert_eq!(vm.memory_mb(), 512);

        let NodeAttributes::Controller(ctrl) = graph.get_node("c1").unwrap().attributes() else {
            panic!("expected controller");
        };
        assert_eq!((ctrl.ip(), ctrl.port()), ("127.0.0.1", "6653"));
    }

    #[test]
    fn test_edit_attribute_validates_before_commit() {
        let mut graph = TopologyGraph::new();
        graph.add_node(NodeType::Host, Some("h1"), Some(host_with_interfaces(2))).unwrap();

        let err = graph
            .edit_attribute(
                "h1",
                AttributeEdit::HostInterfaceMac { index: 1, mac: "02:00:00:00:00:00".into() },
            )
            .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidAttribute { .. }));
        assert!(graph
            .edit_attribute("h1", AttributeEdit::VmMemory(64))
            .is_err());

        graph
            .edit_attribute(
                "h1",
                AttributeEdit::HostInterfaceIp { index: 1, ip: Some("10.0.0.2/8".into()) },
            )
            .unwrap();
        let node = graph.get_node("h1").unwrap();
        assert_eq!(node.attributes().interface_mac(1), Some("02:00:00:00:00:01"));
        let NodeAttributes::Host(host) = node.attributes() else {
            panic!("expected host");
        };
        assert_eq!(host.interfaces()[1].ip(), Some("10.0.0.2/8"));
    }

    #[test]
    fn test_mismatched_attributes_rejected() {
        let mut graph = TopologyGraph::new();
        assert!(matches!(
            graph.add_node(NodeType::Switch, Some("s1"), Some(host_with_interfaces(1))),
            Err(TopologyError::InvalidAttribute { .. })
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_events_follow_mutations() {
        let mut graph = TopologyGraph::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        graph.subscribe(Box::new(move |e: &GraphEvent| sink.borrow_mut().push(e.clone())));

        graph.add_node(NodeType::Host, Some("h1"), None).unwrap();
        graph.add_node(NodeType::Switch, Some("s1"), None).unwrap();
        graph.connect("h1", "s1", None).unwrap();
        graph.rename_node("s1", "sw").unwrap();
        graph.remove_node("sw");

        assert_eq!(
            *events.borrow(),
            vec![
                GraphEvent::NodeAdded { name: "h1".into() },
                GraphEvent::NodeAdded { name: "s1".into() },
                GraphEvent::EdgeAdded { u: "h1".into(), v: "s1".into() },
                GraphEvent::NodeRenamed { old: "s1".into(), new: "sw".into() },
                GraphEvent::EdgeRemoved { u: "h1".into(), v: "sw".into() },
                GraphEvent::NodeRemoved { name: "sw".into() },
            ]
        );
    }

    #[test]
    fn test_replace_with_keeps_listeners() {
        let mut graph = graph_with(&[(NodeType::Host, "old")]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        graph.subscribe(Box::new(move |e: &GraphEvent| sink.borrow_mut().push(e.clone())));

        graph.replace_with(graph_with(&[(NodeType::Switch, "new")]));
        assert!(graph.has_node("new"));
        assert!(!graph.has_node("old"));

        graph.remove_node("new");
        assert_eq!(
            *events.borrow(),
            vec![GraphEvent::Reset, GraphEvent::NodeRemoved { name: "new".into() }]
        );
    }

    #[test]
    fn test_invariants_hold_under_mixed_edits() {
        let mut graph = TopologyGraph::new();
        let types = NodeType::ALL;
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % bound as u64) as usize
        };

        for _ in 0..400 {
            let names: Vec<String> = graph.list_nodes().map(|n| n.name().to_string()).collect();
            match next(6) {
                0 | 1 => {
                    let _ = graph.add_node(types[next(types.len())], None, None);
                }
                2 if names.len() >= 2 => {
                    let u = &names[next(names.len())];
                    let v = &names[next(names.len())];
                    let _ = graph.connect(u, v, None);
                }
                3 if !names.is_empty() => {
                    let u = &names[next(names.len())];
                    let target = format!("n{}", next(50));
                    let _ = graph.rename_node(u, &target);
                }
                4 if !names.is_empty() => {
                    let u = &names[next(names.len())];
                    let count = graph.get_node(u).unwrap().attributes().interface_count();
                    if count > 0 {
                        graph.remove_interface(u, next(count)).unwrap();
                    } else {
                        let _ = graph.add_interface(u);
                    }
                }
                5 if !names.is_empty() && next(3) == 0 => {
                    graph.remove_node(&names[next(names.len())]);
                }
                _ => {}
            }
            graph.check_invariants().unwrap();

            let mut seen = HashSet::new();
            assert!(graph.list_nodes().all(|n| seen.insert(n.name().to_string())));
        }
    }
}
