//! On-disk document types.
//!
//! These structures mirror the JSON layout key for key. They carry no
//! validation of their own; the loader turns them into a graph and rejects
//! anything the graph would not accept.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::topology::DiskImage;

/// Container format version written by this crate
pub const NPGI_VERSION: &str = "1.0";

/// Suffix marking a VNF in a VM definition ID
pub const VNF_SUFFIX: &str = "@VNF";

// ============================================================================
// Topology document
// ============================================================================

/// A complete topology description, also the `TOPO` entry of an NPGI file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TopologyDocument {
    pub id: String,
    /// `./VMS/{name}.json` for every VM
    #[serde(default)]
    pub vms: Vec<String>,
    /// `./VNFS/{name}.json` for every VNF
    #[serde(default)]
    pub vnfs: Vec<String>,
    /// Always written empty
    #[serde(default)]
    pub sfcs: Vec<serde_json::Value>,
    #[serde(default)]
    pub mininet: MininetSection,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Mininet-managed nodes
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MininetSection {
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
    #[serde(default)]
    pub switches: Vec<String>,
    #[serde(default)]
    pub controllers: Vec<ControllerEntry>,
    #[serde(default)]
    pub ovswitches: Vec<OvSwitchEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HostEntry {
    pub id: String,
    #[serde(default)]
    pub interfaces: Vec<HostInterfaceEntry>,
}

/// A host interface. `IP` is written as `null` when unset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct HostInterfaceEntry {
    #[serde(default)]
    pub ip: Option<String>,
    pub mac: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ControllerEntry {
    pub id: String,
    pub ip: String,
    pub port: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OvSwitchEntry {
    pub id: String,
    /// Name of the attached controller
    #[serde(default)]
    pub controller: Option<String>,
}

/// One non-controller link. Interface keys hold the bound interface's MAC.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Connection {
    #[serde(rename = "IN/OUT")]
    pub in_out: String,
    #[serde(
        rename = "IN/OUTIFACE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub in_out_iface: Option<String>,
    #[serde(rename = "OUT/IN")]
    pub out_in: String,
    #[serde(
        rename = "OUT/INIFACE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub out_in_iface: Option<String>,
}

// ============================================================================
// VM definitions
// ============================================================================

/// Full description of a VM
///
/// Inside an NPGI file the ID carries the `@VNF` suffix for VNFs; exported
/// `VMS/{name}.json` files use the plain name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VmDefinition {
    pub id: String,
    pub memory: u32,
    pub vcpu: u32,
    pub disk: DiskImage,
    pub management_mac: String,
    #[serde(default)]
    pub interfaces: Vec<VmInterfaceEntry>,
}

impl VmDefinition {
    /// Split the ID into the node name and the VNF flag
    pub fn name_and_vnf(&self) -> (&str, bool) {
        match self.id.strip_suffix(VNF_SUFFIX) {
            Some(name) => (name, true),
            None => (&self.id, false),
        }
    }
}

/// A VM interface. `LINK_MAC` is omitted while empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VmInterfaceEntry {
    pub id: String,
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_mac: Option<String>,
}

/// Exported `VNFS/{name}.json` entry pointing at the VM definition
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct VnfEntry {
    pub id: String,
    pub vm: String,
}

// ============================================================================
// NPGI container
// ============================================================================

/// Editor save file: topology, VM definitions and node positions
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NpgiDocument {
    pub version: String,
    pub topo: TopologyDocument,
    #[serde(default)]
    pub vms: Vec<VmDefinition>,
    /// Node name to `[x, y]`
    #[serde(default)]
    pub positions: BTreeMap<String, [f64; 2]>,
}

/// Relative path of a VM definition inside an export directory
pub fn vm_path(name: &str) -> String {
    format!("./VMS/{}.json", name)
}

/// Relative path of a VNF entry inside an export directory
pub fn vnf_path(name: &str) -> String {
    format!("./VNFS/{}.json", name)
}
