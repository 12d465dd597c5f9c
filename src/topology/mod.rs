//! Network topology module.
//!
//! This module contains the editable topology graph: typed node and edge
//! entities, the connection rules between node types, change notifications,
//! and the graph itself with all of its mutation operations.

pub mod connections;
pub mod events;
pub mod graph;
pub mod types;

// Re-export key types and functions for easier access
pub use connections::{allowed_peers, can_connect, is_controller_link};
pub use events::{GraphEvent, Listener};
pub use graph::{ConnectOutcome, ConnectPlan, EdgeView, TopologyGraph};
pub use types::{
    AttributeEdit, ControllerAttributes, DiskImage, Edge, HostAttributes, HostInterface,
    InterfaceBinding, Node, NodeAttributes, NodeId, NodeType, OvSwitchAttributes, Position,
    VmAttributes, VmInterface, MAX_VM_MEMORY_MB, MAX_VM_VCPU,
};
