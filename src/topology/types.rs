//! Node and edge entity types.
//!
//! Node attributes are a sum type with one variant per node type, each
//! carrying only the fields that are legal for it. Fields are private and
//! every setter validates its input, so no invalid attribute state can be
//! reached from outside the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TopologyError};
use crate::utils::validation::{
    normalize_mac, normalize_optional_mac, validate_interface_ip, validate_ipv4, validate_port,
    validate_range,
};

/// Upper bound for VM memory in MB
pub const MAX_VM_MEMORY_MB: u32 = 4096;
/// Upper bound for VM virtual CPUs
pub const MAX_VM_VCPU: u32 = 16;

/// Kind of a topology node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Host,
    Switch,
    Controller,
    OVSwitch,
    Vm,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Host,
        NodeType::Switch,
        NodeType::Controller,
        NodeType::OVSwitch,
        NodeType::Vm,
    ];

    /// Whether nodes of this type carry an interface list that edges bind to
    pub fn has_interfaces(self) -> bool {
        matches!(self, NodeType::Host | NodeType::Vm)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Host => "Host",
            NodeType::Switch => "Switch",
            NodeType::Controller => "Controller",
            NodeType::OVSwitch => "OVSwitch",
            NodeType::Vm => "VM",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

/// Disk images a VM can boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskImage {
    #[serde(rename = "click-on-osv")]
    ClickOnOsv,
    #[serde(rename = "tinycore12")]
    Tinycore12,
}

impl DiskImage {
    pub fn as_str(self) -> &'static str {
        match self {
            DiskImage::ClickOnOsv => "click-on-osv",
            DiskImage::Tinycore12 => "tinycore12",
        }
    }
}

impl fmt::Display for DiskImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "click-on-osv" => Ok(DiskImage::ClickOnOsv),
            "tinycore12" => Ok(DiskImage::Tinycore12),
            other => Err(format!(
                "unknown disk image '{}' (expected click-on-osv or tinycore12)",
                other
            )),
        }
    }
}

/// Stable handle of a node inside one graph. Survives renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// Canvas coordinate of a node. Persisted, never validated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Per-type attributes
// ============================================================================

/// Network interface of a Host
#[derive(Debug, Clone, PartialEq)]
pub struct HostInterface {
    ip: Option<String>,
    mac: String,
}

impl HostInterface {
    pub fn new(ip: Option<&str>, mac: &str) -> Result<Self> {
        let mut iface = Self {
            ip: None,
            mac: String::new(),
        };
        iface.set_ip(ip)?;
        iface.set_mac(mac)?;
        Ok(iface)
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Set or clear the address. An empty string clears it.
    pub fn set_ip(&mut self, ip: Option<&str>) -> Result<()> {
        self.ip = match ip.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                validate_interface_ip(raw)
                    .map_err(|e| TopologyError::invalid_attribute("interface IP", raw, e))?,
            ),
            None => None,
        };
        Ok(())
    }

    pub fn set_mac(&mut self, mac: &str) -> Result<()> {
        self.mac =
            normalize_mac(mac).map_err(|e| TopologyError::invalid_attribute("interface MAC", mac, e))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostAttributes {
    pub(crate) interfaces: Vec<HostInterface>,
}

impl HostAttributes {
    pub fn new(interfaces: Vec<HostInterface>) -> Self {
        Self { interfaces }
    }

    pub fn interfaces(&self) -> &[HostInterface] {
        &self.interfaces
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerAttributes {
    ip: String,
    port: String,
}

impl ControllerAttributes {
    pub fn new(ip: &str, port: &str) -> Result<Self> {
        let mut attrs = Self {
            ip: String::new(),
            port: String::new(),
        };
        attrs.set_ip(ip)?;
        attrs.set_port(port)?;
        Ok(attrs)
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn set_ip(&mut self, ip: &str) -> Result<()> {
        self.ip = validate_ipv4(ip).map_err(|e| TopologyError::invalid_attribute("controller IP", ip, e))?;
        Ok(())
    }

    pub fn set_port(&mut self, port: &str) -> Result<()> {
        self.port =
            validate_port(port).map_err(|e| TopologyError::invalid_attribute("controller port", port, e))?;
        Ok(())
    }
}

/// Open vSwitch attributes. The controller is maintained by the graph only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OvSwitchAttributes {
    pub(crate) controller: Option<NodeId>,
}

impl OvSwitchAttributes {
    /// Handle of the connected controller, if any
    pub fn controller(&self) -> Option<NodeId> {
        self.controller
    }
}

/// Network interface of a VM
#[derive(Debug, Clone, PartialEq)]
pub struct VmInterface {
    id: String,
    mac: String,
    link_mac: String,
}

impl VmInterface {
    pub fn new(id: &str, mac: &str, link_mac: &str) -> Result<Self> {
        let mut iface = Self {
            id: String::new(),
            mac: String::new(),
            link_mac: String::new(),
        };
        iface.set_id(id)?;
        iface.set_mac(mac)?;
        iface.set_link_mac(link_mac)?;
        Ok(iface)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// MAC of the peer side of the link. Empty when unset.
    pub fn link_mac(&self) -> &str {
        &self.link_mac
    }

    pub fn set_id(&mut self, id: &str) -> Result<()> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(TopologyError::invalid_attribute(
                "VM interface id",
                id,
                "cannot be empty",
            ));
        }
        self.id = trimmed.to_string();
        Ok(())
    }

    pub fn set_mac(&mut self, mac: &str) -> Result<()> {
        self.mac = normalize_mac(mac)
            .map_err(|e| TopologyError::invalid_attribute("VM interface MAC", mac, e))?;
        Ok(())
    }

    pub fn set_link_mac(&mut self, link_mac: &str) -> Result<()> {
        self.link_mac = normalize_optional_mac(link_mac)
            .map_err(|e| TopologyError::invalid_attribute("VM link MAC", link_mac, e))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmAttributes {
    is_vnf: bool,
    memory_mb: u32,
    vcpu: u32,
    disk_image: DiskImage,
    management_mac: String,
    pub(crate) interfaces: Vec<VmInterface>,
}

impl VmAttributes {
    pub fn new(
        is_vnf: bool,
        memory_mb: u32,
        vcpu: u32,
        disk_image: DiskImage,
        management_mac: &str,
        interfaces: Vec<VmInterface>,
    ) -> Result<Self> {
        let mut attrs = Self {
            is_vnf,
            memory_mb: 1,
            vcpu: 1,
            disk_image,
            management_mac: String::new(),
            interfaces,
        };
        attrs.set_memory_mb(memory_mb)?;
        attrs.set_vcpu(vcpu)?;
        attrs.set_management_mac(management_mac)?;
        Ok(attrs)
    }

    pub fn is_vnf(&self) -> bool {
        self.is_vnf
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn vcpu(&self) -> u32 {
        self.vcpu
    }

    pub fn disk_image(&self) -> DiskImage {
        self.disk_image
    }

    pub fn management_mac(&self) -> &str {
        &self.management_mac
    }

    pub fn interfaces(&self) -> &[VmInterface] {
        &self.interfaces
    }

    pub fn set_vnf(&mut self, is_vnf: bool) {
        self.is_vnf = is_vnf;
    }

    pub fn set_memory_mb(&mut self, memory_mb: u32) -> Result<()> {
        self.memory_mb = validate_range(memory_mb, 1, MAX_VM_MEMORY_MB).map_err(|e| {
            TopologyError::invalid_attribute("VM memory", memory_mb.to_string(), e)
        })?;
        Ok(())
    }

    pub fn set_vcpu(&mut self, vcpu: u32) -> Result<()> {
        self.vcpu = validate_range(vcpu, 1, MAX_VM_VCPU)
            .map_err(|e| TopologyError::invalid_attribute("VM vcpu", vcpu.to_string(), e))?;
        Ok(())
    }

    pub fn set_disk_image(&mut self, disk_image: DiskImage) {
        self.disk_image = disk_image;
    }

    pub fn set_management_mac(&mut self, mac: &str) -> Result<()> {
        self.management_mac = normalize_mac(mac)
            .map_err(|e| TopologyError::invalid_attribute("VM management MAC", mac, e))?;
        Ok(())
    }
}

/// Type-specific attributes of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAttributes {
    Host(HostAttributes),
    Switch,
    Controller(ControllerAttributes),
    OVSwitch(OvSwitchAttributes),
    Vm(VmAttributes),
}

impl NodeAttributes {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeAttributes::Host(_) => NodeType::Host,
            NodeAttributes::Switch => NodeType::Switch,
            NodeAttributes::Controller(_) => NodeType::Controller,
            NodeAttributes::OVSwitch(_) => NodeType::OVSwitch,
            NodeAttributes::Vm(_) => NodeType::Vm,
        }
    }

    /// Number of bindable interfaces (0 for types without interfaces)
    pub fn interface_count(&self) -> usize {
        match self {
            NodeAttributes::Host(host) => host.interfaces.len(),
            NodeAttributes::Vm(vm) => vm.interfaces.len(),
            _ => 0,
        }
    }

    /// MAC of the interface at `index`
    pub fn interface_mac(&self, index: usize) -> Option<&str> {
        match self {
            NodeAttributes::Host(host) => host.interfaces.get(index).map(HostInterface::mac),
            NodeAttributes::Vm(vm) => vm.interfaces.get(index).map(VmInterface::mac),
            _ => None,
        }
    }

    /// Index of the first interface whose MAC equals `mac` (case-insensitive)
    pub fn find_interface_by_mac(&self, mac: &str) -> Option<usize> {
        let count = self.interface_count();
        (0..count).find(|i| {
            self.interface_mac(*i)
                .is_some_and(|m| m.eq_ignore_ascii_case(mac.trim()))
        })
    }

    /// Apply a raw attribute edit, validating before anything changes
    pub fn apply(&mut self, edit: AttributeEdit) -> Result<()> {
        match (self, edit) {
            (NodeAttributes::Host(host), AttributeEdit::HostInterfaceIp { index, ip }) => {
                host_interface(host, index)?.set_ip(ip.as_deref())
            }
            (NodeAttributes::Host(host), AttributeEdit::HostInterfaceMac { index, mac }) => {
                host_interface(host, index)?.set_mac(&mac)
            }
            (NodeAttributes::Controller(ctrl), AttributeEdit::ControllerIp(ip)) => ctrl.set_ip(&ip),
            (NodeAttributes::Controller(ctrl), AttributeEdit::ControllerPort(port)) => {
                ctrl.set_port(&port)
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmVnf(is_vnf)) => {
                vm.set_vnf(is_vnf);
                Ok(())
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmMemory(memory_mb)) => vm.set_memory_mb(memory_mb),
            (NodeAttributes::Vm(vm), AttributeEdit::VmVcpu(vcpu)) => vm.set_vcpu(vcpu),
            (NodeAttributes::Vm(vm), AttributeEdit::VmDiskImage(raw)) => {
                let disk = raw
                    .parse::<DiskImage>()
                    .map_err(|e| TopologyError::invalid_attribute("VM disk image", raw.as_str(), e))?;
                vm.set_disk_image(disk);
                Ok(())
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmManagementMac(mac)) => {
                vm.set_management_mac(&mac)
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmInterfaceId { index, id }) => {
                vm_interface(vm, index)?.set_id(&id)
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmInterfaceMac { index, mac }) => {
                vm_interface(vm, index)?.set_mac(&mac)
            }
            (NodeAttributes::Vm(vm), AttributeEdit::VmInterfaceLinkMac { index, link_mac }) => {
                vm_interface(vm, index)?.set_link_mac(&link_mac)
            }
            (attrs, edit) => Err(TopologyError::invalid_attribute(
                edit.field(),
                format!("{:?}", edit),
                format!("not an attribute of a {} node", attrs.node_type()),
            )),
        }
    }
}

fn host_interface(host: &mut HostAttributes, index: usize) -> Result<&mut HostInterface> {
    let count = host.interfaces.len();
    host.interfaces.get_mut(index).ok_or_else(|| {
        TopologyError::invalid_attribute(
            "interface index",
            index.to_string(),
            format!("host has {} interface(s)", count),
        )
    })
}

fn vm_interface(vm: &mut VmAttributes, index: usize) -> Result<&mut VmInterface> {
    let count = vm.interfaces.len();
    vm.interfaces.get_mut(index).ok_or_else(|| {
        TopologyError::invalid_attribute(
            "interface index",
            index.to_string(),
            format!("VM has {} interface(s)", count),
        )
    })
}

/// Raw attribute edit requested by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeEdit {
    HostInterfaceIp { index: usize, ip: Option<String> },
    HostInterfaceMac { index: usize, mac: String },
    ControllerIp(String),
    ControllerPort(String),
    VmVnf(bool),
    VmMemory(u32),
    VmVcpu(u32),
    VmDiskImage(String),
    VmManagementMac(String),
    VmInterfaceId { index: usize, id: String },
    VmInterfaceMac { index: usize, mac: String },
    VmInterfaceLinkMac { index: usize, link_mac: String },
}

impl AttributeEdit {
    fn field(&self) -> &'static str {
        match self {
            AttributeEdit::HostInterfaceIp { .. } => "interface IP",
            AttributeEdit::HostInterfaceMac { .. } => "interface MAC",
            AttributeEdit::ControllerIp(_) => "controller IP",
            AttributeEdit::ControllerPort(_) => "controller port",
            AttributeEdit::VmVnf(_) => "VM VNF flag",
            AttributeEdit::VmMemory(_) => "VM memory",
            AttributeEdit::VmVcpu(_) => "VM vcpu",
            AttributeEdit::VmDiskImage(_) => "VM disk image",
            AttributeEdit::VmManagementMac(_) => "VM management MAC",
            AttributeEdit::VmInterfaceId { .. } => "VM interface id",
            AttributeEdit::VmInterfaceMac { .. } => "VM interface MAC",
            AttributeEdit::VmInterfaceLinkMac { .. } => "VM link MAC",
        }
    }
}

// ============================================================================
// Graph entities
// ============================================================================

/// A node owned by a topology graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) attributes: NodeAttributes,
    pub(crate) position: Position,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.attributes.node_type()
    }

    pub fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_interfaces(&self) -> bool {
        self.node_type().has_interfaces()
    }
}

/// Interface indices bound at each end of an edge, aligned with `(u, v)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceBinding {
    pub u: Option<usize>,
    pub v: Option<usize>,
}

impl InterfaceBinding {
    pub fn new(u: Option<usize>, v: Option<usize>) -> Self {
        Self { u, v }
    }
}

/// A link between two nodes. Orientation is kept as created.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(crate) u: NodeId,
    pub(crate) v: NodeId,
    pub(crate) binding: InterfaceBinding,
}

impl Edge {
    pub fn u(&self) -> NodeId {
        self.u
    }

    pub fn v(&self) -> NodeId {
        self.v
    }

    pub fn binding(&self) -> InterfaceBinding {
        self.binding
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.u == id || self.v == id
    }

    /// The other endpoint, when `id` is one of the two
    pub fn peer_of(&self, id: NodeId) -> Option<NodeId> {
        if self.u == id {
            Some(self.v)
        } else if self.v == id {
            Some(self.u)
        } else {
            None
        }
    }

    /// Bound interface index on the side of `id`
    pub fn binding_for(&self, id: NodeId) -> Option<usize> {
        if self.u == id {
            self.binding.u
        } else if self.v == id {
            self.binding.v
        } else {
            None
        }
    }

    pub(crate) fn binding_slot_mut(&mut self, id: NodeId) -> Option<&mut Option<usize>> {
        if self.u == id {
            Some(&mut self.binding.u)
        } else if self.v == id {
            Some(&mut self.binding.v)
        } else {
            None
        }
    }
}

/// Order-independent key of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub(crate) fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vm() -> VmAttributes {
        VmAttributes::new(
            false,
            512,
            1,
            DiskImage::ClickOnOsv,
            "00:00:00:00:00:aa",
            vec![VmInterface::new("eth0", "00:00:00:00:00:01", "").unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_node_type_parsing() {
        assert_eq!("vm".parse::<NodeType>(), Ok(NodeType::Vm));
        assert_eq!("OVSwitch".parse::<NodeType>(), Ok(NodeType::OVSwitch));
        assert!("router".parse::<NodeType>().is_err());
        assert!(NodeType::Host.has_interfaces());
        assert!(!NodeType::OVSwitch.has_interfaces());
    }

    #[test]
    fn test_disk_image_only_accepts_enumerated_names() {
        assert_eq!("tinycore12".parse::<DiskImage>(), Ok(DiskImage::Tinycore12));
        assert!("ubuntu".parse::<DiskImage>().is_err());
        assert_eq!(
            serde_json::to_string(&DiskImage::ClickOnOsv).unwrap(),
            "\"click-on-osv\""
        );
    }

    #[test]
    fn test_host_interface_setters_validate() {
        let mut iface = HostInterface::new(Some("10.0.0.1/24"), "00:00:00:00:00:01").unwrap();
        assert!(iface.set_ip(Some("10.0.0.300")).is_err());
        assert_eq!(iface.ip(), Some("10.0.0.1/24"));
        iface.set_ip(Some("")).unwrap();
        assert_eq!(iface.ip(), None);
        assert!(iface.set_mac("bogus").is_err());
        assert_eq!(iface.mac(), "00:00:00:00:00:01");
    }

    #[test]
    fn test_vm_resource_bounds() {
        let mut vm = sample_vm();
        assert!(vm.set_memory_mb(0).is_err());
        assert!(vm.set_memory_mb(4097).is_err());
        vm.set_memory_mb(4096).unwrap();
        assert!(vm.set_vcpu(17).is_err());
        vm.set_vcpu(16).unwrap();
        assert_eq!(vm.memory_mb(), 4096);
        assert_eq!(vm.vcpu(), 16);
    }

    #[test]
    fn test_apply_rejects_edits_for_other_types() {
        let mut attrs = NodeAttributes::Switch;
        let err = attrs
            .apply(AttributeEdit::ControllerIp("127.0.0.1".into()))
            .unwrap_err();
        assert!(matches!(err, TopologyError::InvalidAttribute { .. }));
        assert_eq!(attrs, NodeAttributes::Switch);
    }

    #[test]
    fn test_apply_vm_edits() {
        let mut attrs = NodeAttributes::Vm(sample_vm());
        attrs.apply(AttributeEdit::VmDiskImage("tinycore12".into())).unwrap();
        attrs.apply(AttributeEdit::VmVnf(true)).unwrap();
        attrs
            .apply(AttributeEdit::VmInterfaceLinkMac {
                index: 0,
                link_mac: "00:00:00:00:00:02".into(),
            })
            .unwrap();
        assert!(attrs
            .apply(AttributeEdit::VmDiskImage("debian".into()))
            .is_err());
        assert!(attrs
            .apply(AttributeEdit::VmInterfaceId { index: 3, id: "eth3".into() })
            .is_err());

        let NodeAttributes::Vm(vm) = &attrs else {
            panic!("expected VM attributes");
        };
        assert!(vm.is_vnf());
        assert_eq!(vm.disk_image(), DiskImage::Tinycore12);
        assert_eq!(vm.interfaces()[0].link_mac(), "00:00:00:00:00:02");
    }

    #[test]
    fn test_find_interface_by_mac() {
        let attrs = NodeAttributes::Host(HostAttributes::new(vec![
            HostInterface::new(None, "00:00:00:00:00:01").unwrap(),
            HostInterface::new(None, "00:00:00:00:00:02").unwrap(),
        ]));
        assert_eq!(attrs.find_interface_by_mac("00:00:00:00:00:02"), Some(1));
        assert_eq!(attrs.find_interface_by_mac("00:00:00:00:00:03"), None);
        assert_eq!(NodeAttributes::Switch.find_interface_by_mac("00:00:00:00:00:01"), None);
    }

    #[test]
    fn test_edge_key_is_unordered() {
        assert_eq!(EdgeKey::new(NodeId(1), NodeId(2)), EdgeKey::new(NodeId(2), NodeId(1)));
    }
}
