//! Export of a topology as a directory tree for the emulation tooling.
//!
//! Layout produced under the target directory:
//!
//! ```text
//! {ID}.json          topology document
//! VMS/{name}.json    one VM definition per VM
//! VNFS/{name}.json   one pointer entry per VNF
//! ```

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TopologyError};
use crate::npgi::types::{vm_path, VnfEntry};
use crate::npgi::writer::{topology_document, vm_definition, write_json};
use crate::topology::{NodeAttributes, TopologyGraph};
use crate::utils::paths::is_plain_file_name;

/// Files written by [`export_topology`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub topology: PathBuf,
    pub vm_files: Vec<PathBuf>,
    pub vnf_files: Vec<PathBuf>,
}

/// Write the topology and its VM/VNF definitions into `dir`
///
/// Missing directories are created; existing files with the same names are
/// overwritten. Every file name is checked before anything is written, so a
/// rejected export leaves `dir` untouched.
pub fn export_topology(graph: &TopologyGraph, dir: &Path, id: &str) -> Result<ExportSummary> {
    let vm_names = graph
        .list_nodes()
        .filter(|node| matches!(node.attributes(), NodeAttributes::Vm(_)))
        .map(|node| node.name());
    if let Some(bad) = std::iter::once(id).chain(vm_names).find(|n| !is_plain_file_name(n)) {
        return Err(TopologyError::InvalidName(bad.to_string()));
    }

    let vms_dir = dir.join("VMS");
    let vnfs_dir = dir.join("VNFS");
    fs::create_dir_all(&vms_dir)?;
    fs::create_dir_all(&vnfs_dir)?;

    let topology = dir.join(format!("{}.json", id));
    write_json(&topology, &topology_document(graph, id))?;

    let mut vm_files = Vec::new();
    let mut vnf_files = Vec::new();
    for node in graph.list_nodes() {
        let NodeAttributes::Vm(vm) = node.attributes() else {
            continue;
        };
        let name = node.name();

        let vm_file = vms_dir.join(format!("{}.json", name));
        write_json(&vm_file, &vm_definition(name, vm, false))?;
        debug!("Wrote VM definition {}", vm_file.display());
        vm_files.push(vm_file);

        if vm.is_vnf() {
            let vnf_file = vnfs_dir.join(format!("{}.json", name));
            let entry = VnfEntry {
                id: name.to_string(),
                vm: vm_path(name),
            };
            write_json(&vnf_file, &entry)?;
            vnf_files.push(vnf_file);
        }
    }

    info!(
        "Exported {} to {} ({} VMs, {} VNFs)",
        id,
        dir.display(),
        vm_files.len(),
        vnf_files.len()
    );
    Ok(ExportSummary {
        topology,
        vm_files,
        vnf_files,
    })
}
