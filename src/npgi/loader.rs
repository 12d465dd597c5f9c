//! Document to graph conversion and file input.
//!
//! Loading always builds a fresh graph. Callers swap it in with
//! [`TopologyGraph::replace_with`] only once the whole file was accepted, so a
//! failed load never disturbs the graph being edited.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::EditorConfig;
use crate::error::{Result, TopologyError};
use crate::npgi::types::{NpgiDocument, TopologyDocument, VmDefinition};
use crate::topology::{
    ControllerAttributes, HostAttributes, HostInterface, InterfaceBinding, Node, NodeAttributes,
    NodeType, OvSwitchAttributes, Position, TopologyGraph, VmAttributes, VmInterface,
};

/// A graph rebuilt from a file
#[derive(Debug)]
pub struct LoadedTopology {
    /// Topology ID found in the document
    pub id: String,
    pub graph: TopologyGraph,
    /// Nodes without a saved position, placed at the origin
    pub missing_positions: Vec<String>,
}

/// Load an NPGI file with default editor settings
pub fn load_npgi(path: &Path) -> Result<LoadedTopology> {
    load_npgi_with_config(path, &EditorConfig::default())
}

pub fn load_npgi_with_config(path: &Path, config: &EditorConfig) -> Result<LoadedTopology> {
    let document: NpgiDocument = read_json(path)?;
    let loaded = from_npgi_document(document, config)?;
    info!(
        "Loaded {} ({} nodes, {} links) from {}",
        loaded.id,
        loaded.graph.node_count(),
        loaded.graph.edge_count(),
        path.display()
    );
    Ok(loaded)
}

/// Load a bare topology document; every node lands at the origin
pub fn load_topology_file(path: &Path) -> Result<LoadedTopology> {
    load_topology_file_with_config(path, &EditorConfig::default())
}

pub fn load_topology_file_with_config(
    path: &Path,
    config: &EditorConfig,
) -> Result<LoadedTopology> {
    let document: TopologyDocument = read_json(path)?;
    let loaded = from_topology_document(document, config)?;
    info!(
        "Loaded topology {} ({} nodes, {} links) from {}",
        loaded.id,
        loaded.graph.node_count(),
        loaded.graph.edge_count(),
        path.display()
    );
    Ok(loaded)
}

/// Load either format, picked by extension (`.json` is a topology document)
pub fn load_file(path: &Path, config: &EditorConfig) -> Result<LoadedTopology> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_topology_file_with_config(path, config)
    } else {
        load_npgi_with_config(path, config)
    }
}

/// Rebuild a graph from an NPGI container
pub fn from_npgi_document(document: NpgiDocument, config: &EditorConfig) -> Result<LoadedTopology> {
    check_version(&document.version)?;
    let mut builder = GraphBuilder::new(config, Some(document.positions))?;
    builder.add_hosts_and_switches(&document.topo)?;
    builder.add_vms(&document.vms)?;
    builder.add_controllers_and_ovswitches(&document.topo)?;
    builder.add_connections(&document.topo)?;
    Ok(builder.finish(document.topo.id))
}

/// Rebuild a graph from a topology document
///
/// VM definitions only travel inside NPGI files, so connections naming a VM
/// cannot be resolved here.
pub fn from_topology_document(
    document: TopologyDocument,
    config: &EditorConfig,
) -> Result<LoadedTopology> {
    let mut builder = GraphBuilder::new(config, None)?;
    builder.add_hosts_and_switches(&document)?;
    builder.add_controllers_and_ovswitches(&document)?;
    builder.add_connections(&document)?;
    Ok(builder.finish(document.id))
}

fn check_version(version: &str) -> Result<()> {
    match version.trim().split('.').next() {
        Some("1") => Ok(()),
        _ => Err(TopologyError::MalformedDocument(format!(
            "unsupported NPGI version '{}'",
            version
        ))),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| TopologyError::MalformedDocument(format!("{}: {}", path.display(), e)))
}

/// Anything the graph refuses while loading makes the document malformed
fn malformed(err: TopologyError) -> TopologyError {
    match err {
        TopologyError::MalformedDocument(_) | TopologyError::DanglingReference(_) => err,
        other => TopologyError::MalformedDocument(other.to_string()),
    }
}

struct GraphBuilder {
    graph: TopologyGraph,
    /// `None` when the document carries no positions at all
    positions: Option<BTreeMap<String, [f64; 2]>>,
    missing_positions: Vec<String>,
}

impl GraphBuilder {
    fn new(config: &EditorConfig, positions: Option<BTreeMap<String, [f64; 2]>>) -> Result<Self> {
        // Node names are trimmed by the graph, so keys must match the trimmed form
        let positions = positions.map(|p| {
            p.into_iter()
                .map(|(name, xy)| (name.trim().to_string(), xy))
                .collect()
        });
        Ok(Self {
            graph: TopologyGraph::with_config(config.clone())?,
            positions,
            missing_positions: Vec::new(),
        })
    }

    fn add(&mut self, node_type: NodeType, name: &str, attributes: NodeAttributes) -> Result<()> {
        let name = name.trim();
        let position = match self.positions.as_ref().and_then(|p| p.get(name)) {
            Some([x, y]) => Position::new(*x, *y),
            None => {
                self.missing_positions.push(name.to_string());
                Position::default()
            }
        };
        self.graph
            .add_node_at(node_type, Some(name), Some(attributes), position)
            .map_err(malformed)?;
        Ok(())
    }

    fn add_hosts_and_switches(&mut self, topo: &TopologyDocument) -> Result<()> {
        for host in &topo.mininet.hosts {
            let interfaces = host
                .interfaces
                .iter()
                .map(|iface| HostInterface::new(iface.ip.as_deref(), &iface.mac))
                .collect::<Result<Vec<_>>>()
                .map_err(malformed)?;
            self.add(
                NodeType::Host,
                &host.id,
                NodeAttributes::Host(HostAttributes::new(interfaces)),
            )?;
        }
        for switch in &topo.mininet.switches {
            self.add(NodeType::Switch, switch, NodeAttributes::Switch)?;
        }
        Ok(())
    }

    fn add_vms(&mut self, definitions: &[VmDefinition]) -> Result<()> {
        for def in definitions {
            let (name, is_vnf) = def.name_and_vnf();
            let interfaces = def
                .interfaces
                .iter()
                .map(|iface| {
                    if iface.link_mac.is_none() {
                        debug!("{}: no LINK_MAC on {}, using an empty one", name, iface.id);
                    }
                    VmInterface::new(&iface.id, &iface.mac, iface.link_mac.as_deref().unwrap_or(""))
                })
                .collect::<Result<Vec<_>>>()
                .map_err(malformed)?;
            let vm = VmAttributes::new(
                is_vnf,
                def.memory,
                def.vcpu,
                def.disk,
                &def.management_mac,
                interfaces,
            )
            .map_err(malformed)?;
            self.add(NodeType::Vm, name, NodeAttributes::Vm(vm))?;
        }
        Ok(())
    }

    fn add_controllers_and_ovswitches(&mut self, topo: &TopologyDocument) -> Result<()> {
        for ctrl in &topo.mininet.controllers {
            let attrs = ControllerAttributes::new(&ctrl.ip, &ctrl.port).map_err(malformed)?;
            self.add(NodeType::Controller, &ctrl.id, NodeAttributes::Controller(attrs))?;
        }
        for ovs in &topo.mininet.ovswitches {
            self.add(
                NodeType::OVSwitch,
                &ovs.id,
                NodeAttributes::OVSwitch(OvSwitchAttributes::default()),
            )?;
            if let Some(controller) = &ovs.controller {
                let controller = controller.trim();
                if !self.graph.has_node(controller) {
                    return Err(TopologyError::DanglingReference(format!(
                        "OVSwitch {} names unknown controller {}",
                        ovs.id, controller
                    )));
                }
                self.graph
                    .connect(ovs.id.trim(), controller, None)
                    .map_err(malformed)?;
            }
        }
        Ok(())
    }

    fn add_connections(&mut self, topo: &TopologyDocument) -> Result<()> {
        for conn in &topo.connections {
            let (u_name, v_name) = (conn.in_out.trim(), conn.out_in.trim());
            let u = self.endpoint(u_name)?;
            let v = self.endpoint(v_name)?;
            let binding = InterfaceBinding::new(
                bound_interface(u, conn.in_out_iface.as_deref())?,
                bound_interface(v, conn.out_in_iface.as_deref())?,
            );
            self.graph
                .connect(u_name, v_name, Some(binding))
                .map_err(malformed)?;
        }
        Ok(())
    }

    fn endpoint(&self, name: &str) -> Result<&Node> {
        self.graph.get_node(name).ok_or_else(|| {
            TopologyError::DanglingReference(format!("connection names unknown node {}", name))
        })
    }

    fn finish(self, id: String) -> LoadedTopology {
        if let Some(positions) = &self.positions {
            for name in positions.keys().filter(|name| !self.graph.has_node(name)) {
                warn!("Ignoring position of unknown node {}", name);
            }
        }
        if !self.missing_positions.is_empty() {
            warn!(
                "{} node(s) had no saved position and were placed at the origin",
                self.missing_positions.len()
            );
        }
        LoadedTopology {
            id,
            graph: self.graph,
            missing_positions: self.missing_positions,
        }
    }
}

/// Interface index for a MAC written on a connection endpoint
fn bound_interface(node: &Node, mac: Option<&str>) -> Result<Option<usize>> {
    match mac {
        Some(mac) if node.has_interfaces() => node
            .attributes()
            .find_interface_by_mac(mac)
            .map(Some)
            .ok_or_else(|| {
                TopologyError::DanglingReference(format!(
                    "{} has no interface with MAC {}",
                    node.name(),
                    mac
                ))
            }),
        _ => Ok(None),
    }
}
