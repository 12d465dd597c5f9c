//! Connection rules between node types.
//!
//! The relation is symmetric: a pair is allowed in one orientation exactly
//! when it is allowed in the other.
//!
//! ```text
//! Host       <-> Host, Switch, OVSwitch, VM
//! Switch     <-> Host, VM
//! OVSwitch   <-> Host, VM, Controller
//! Controller <-> OVSwitch
//! VM         <-> Host, Switch, OVSwitch, VM
//! ```

use crate::topology::types::NodeType;

/// Peer types a node of type `node_type` may be linked to
pub fn allowed_peers(node_type: NodeType) -> &'static [NodeType] {
    use NodeType::*;
    match node_type {
        Host => &[Host, Switch, OVSwitch, Vm],
        Switch => &[Host, Vm],
        OVSwitch => &[Host, Vm, Controller],
        Controller => &[OVSwitch],
        Vm => &[Host, Switch, OVSwitch, Vm],
    }
}

/// Whether nodes of types `a` and `b` may be linked
pub fn can_connect(a: NodeType, b: NodeType) -> bool {
    allowed_peers(a).contains(&b)
}

/// Whether a link between `a` and `b` is a controller attachment
pub fn is_controller_link(a: NodeType, b: NodeType) -> bool {
    matches!(
        (a, b),
        (NodeType::OVSwitch, NodeType::Controller) | (NodeType::Controller, NodeType::OVSwitch)
    )
}
