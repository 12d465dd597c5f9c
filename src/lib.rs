//! # topoedit - Topology graph model and persistence for network emulation
//!
//! This library provides the data model behind a graphical network topology
//! editor: a typed graph of hosts, switches, controllers, Open vSwitches and
//! virtual machines, plus the file formats used to save it and hand it to
//! the emulation tooling.
//!
//! ## Overview
//!
//! Every edit goes through [`topology::TopologyGraph`], which keeps the
//! graph consistent at all times: names are unique, links respect the
//! connection rules between node types, an OVSwitch has at most one
//! controller, and interface bindings always point at existing interfaces.
//! A rejected edit returns an error and leaves the graph exactly as it was.
//!
//! ## Key Features
//!
//! - **Typed nodes**: Host, Switch, Controller, OVSwitch and VM, each with its own attributes
//! - **Connection rules**: Symmetric type table checked on every link
//! - **Interface bindings**: Links remember which interface each endpoint uses
//! - **Generated identifiers**: Default names, IPv4 and MAC addresses per graph
//! - **Persistence**: NPGI save files and topology JSON documents
//! - **Export**: Directory tree with the topology and VM/VNF definitions
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Editor settings (naming, address seeds, attribute defaults)
//! - `config_loader`: Settings file loading
//! - `error`: Error taxonomy shared by all modules
//! - `ident`: Name, IPv4 and MAC generators
//! - `topology`: Node/edge entities, connection rules and the graph itself
//! - `npgi`: Topology document and NPGI container reading and writing
//! - `export`: Export directory layout
//! - `utils`: Validation and path helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use topoedit::npgi::{load_npgi, save_npgi};
//! use topoedit::topology::{NodeType, TopologyGraph};
//!
//! let mut graph = TopologyGraph::new();
//! graph.add_node(NodeType::Host, None, None)?;
//! graph.add_node(NodeType::Switch, None, None)?;
//! graph.connect("h1", "s1", None)?;
//!
//! let written = save_npgi(&graph, Path::new("lab"))?;
//! let loaded = load_npgi(&written)?;
//! assert_eq!(loaded.graph.edge_count(), 1);
//! # Ok::<(), topoedit::TopologyError>(())
//! ```
//!
//! ## Configuration Format
//!
//! Editor settings use YAML; every section is optional:
//!
//! ```yaml
//! naming:
//!   host: h
//!   switch: s
//!   controller: c
//!   ovswitch: ovs
//!   vm: vm
//!
//! addresses:
//!   ipv4_seed: "192.168.0.1"
//!   mac_seed: "00:00:00:00:00:00"
//!
//! defaults:
//!   controller: { ip: "127.0.0.1", port: "6653" }
//!   vm: { memory_mb: 512, vcpu: 1, disk_image: click-on-osv }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`TopologyError`] (or [`config::ConfigError`] for
//! settings) as values. Nothing in the library terminates the process; the
//! `topoedit` binary wraps these errors with `color_eyre` context.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod export;
pub mod ident;
pub mod npgi;
pub mod topology;
pub mod utils;

pub use config::EditorConfig;
pub use error::{RejectReason, Result, TopologyError};
pub use topology::{GraphEvent, NodeType, TopologyGraph};
