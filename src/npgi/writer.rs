//! Graph to document conversion and file output.

use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::npgi::types::{
    vm_path, vnf_path, Connection, ControllerEntry, HostEntry, HostInterfaceEntry,
    MininetSection, NpgiDocument, OvSwitchEntry, TopologyDocument, VmDefinition,
    VmInterfaceEntry, NPGI_VERSION, VNF_SUFFIX,
};
use crate::topology::{Node, NodeAttributes, NodeType, TopologyGraph, VmAttributes};
use crate::utils::paths::{document_id, with_default_extension};

/// Build the topology document for `graph` under the given ID
pub fn topology_document(graph: &TopologyGraph, id: &str) -> TopologyDocument {
    let vms: Vec<(&Node, &VmAttributes)> = vm_nodes(graph).collect();

    let hosts = graph
        .list_nodes()
        .filter_map(|node| match node.attributes() {
            NodeAttributes::Host(host) => Some(HostEntry {
                id: node.name().to_string(),
                interfaces: host
                    .interfaces()
                    .iter()
                    .map(|iface| HostInterfaceEntry {
                        ip: iface.ip().map(str::to_string),
                        mac: iface.mac().to_string(),
                    })
                    .collect(),
            }),
            _ => None,
        })
        .collect();

    let controllers = graph
        .list_nodes()
        .filter_map(|node| match node.attributes() {
            NodeAttributes::Controller(ctrl) => Some(ControllerEntry {
                id: node.name().to_string(),
                ip: ctrl.ip().to_string(),
                port: ctrl.port().to_string(),
            }),
            _ => None,
        })
        .collect();

    let ovswitches = graph
        .nodes_of_type(NodeType::OVSwitch)
        .map(|node| OvSwitchEntry {
            id: node.name().to_string(),
            controller: graph.controller_of(node.name()).map(|c| c.name().to_string()),
        })
        .collect();

    let connections = graph
        .list_edges()
        .filter(|edge| !edge.is_controller_link())
        .map(|edge| Connection {
            in_out: edge.u.name().to_string(),
            in_out_iface: edge.u_interface_mac().map(str::to_string),
            out_in: edge.v.name().to_string(),
            out_in_iface: edge.v_interface_mac().map(str::to_string),
        })
        .collect();

    TopologyDocument {
        id: id.to_string(),
        vms: vms.iter().map(|(node, _)| vm_path(node.name())).collect(),
        vnfs: vms
            .iter()
            .filter(|(_, vm)| vm.is_vnf())
            .map(|(node, _)| vnf_path(node.name()))
            .collect(),
        sfcs: Vec::new(),
        mininet: MininetSection {
            hosts,
            switches: graph
                .nodes_of_type(NodeType::Switch)
                .map(|node| node.name().to_string())
                .collect(),
            controllers,
            ovswitches,
        },
        connections,
    }
}

/// Describe one VM; `tag_vnf` appends `@VNF` to the ID of VNFs
pub fn vm_definition(name: &str, vm: &VmAttributes, tag_vnf: bool) -> VmDefinition {
    let id = if tag_vnf && vm.is_vnf() {
        format!("{}{}", name, VNF_SUFFIX)
    } else {
        name.to_string()
    };
    VmDefinition {
        id,
        memory: vm.memory_mb(),
        vcpu: vm.vcpu(),
        disk: vm.disk_image(),
        management_mac: vm.management_mac().to_string(),
        interfaces: vm
            .interfaces()
            .iter()
            .map(|iface| VmInterfaceEntry {
                id: iface.id().to_string(),
                mac: iface.mac().to_string(),
                link_mac: Some(iface.link_mac())
                    .filter(|link| !link.is_empty())
                    .map(str::to_string),
            })
            .collect(),
    }
}

/// Build the full NPGI container for `graph`
pub fn npgi_document(graph: &TopologyGraph, id: &str) -> NpgiDocument {
    let positions: BTreeMap<String, [f64; 2]> = graph
        .list_nodes()
        .map(|node| {
            let pos = node.position();
            (node.name().to_string(), [pos.x, pos.y])
        })
        .collect();

    NpgiDocument {
        version: NPGI_VERSION.to_string(),
        topo: topology_document(graph, id),
        vms: vm_nodes(graph)
            .map(|(node, vm)| vm_definition(node.name(), vm, true))
            .collect(),
        positions,
    }
}

/// Save `graph` as an NPGI file, adding `.npgi` when the path has no extension
///
/// Returns the path actually written.
pub fn save_npgi(graph: &TopologyGraph, path: &Path) -> Result<PathBuf> {
    let target = with_default_extension(path, "npgi");
    let document = npgi_document(graph, &document_id(path));
    write_json(&target, &document)?;
    info!(
        "Saved {} nodes and {} links to {}",
        graph.node_count(),
        graph.edge_count(),
        target.display()
    );
    Ok(target)
}

/// Save the topology document alone, adding `.json` when the path has no extension
pub fn save_topology(graph: &TopologyGraph, path: &Path) -> Result<PathBuf> {
    let target = with_default_extension(path, "json");
    let document = topology_document(graph, &document_id(path));
    write_json(&target, &document)?;
    info!("Wrote topology {} to {}", document.id, target.display());
    Ok(target)
}

/// Write `value` as pretty-printed JSON
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn vm_nodes(graph: &TopologyGraph) -> impl Iterator<Item = (&Node, &VmAttributes)> + '_ {
    graph.list_nodes().filter_map(|node| match node.attributes() {
        NodeAttributes::Vm(vm) => Some((node, vm)),
        _ => None,
    })
}
