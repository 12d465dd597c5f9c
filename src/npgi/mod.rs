//! Topology persistence.
//!
//! Two file formats are handled here:
//!
//! - the topology document (`*.json`), the description consumed by the
//!   emulation tooling
//! - the NPGI container (`*.npgi`), the editor's own save file bundling the
//!   topology document with VM definitions and node positions
//!
//! On disk, edges refer to interfaces by MAC address; in memory they use
//! interface indices. The writer and loader translate between the two.

pub mod loader;
pub mod types;
pub mod writer;

pub use loader::{
    from_npgi_document, from_topology_document, load_file, load_npgi, load_npgi_with_config,
    load_topology_file, load_topology_file_with_config, LoadedTopology,
};
pub use types::{
    Connection, ControllerEntry, HostEntry, HostInterfaceEntry, MininetSection, NpgiDocument,
    OvSwitchEntry, TopologyDocument, VmDefinition, VmInterfaceEntry, VnfEntry, NPGI_VERSION,
};
pub use writer::{npgi_document, save_npgi, save_topology, topology_document, vm_definition};
