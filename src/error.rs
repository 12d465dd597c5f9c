//! Error taxonomy for graph edits and topology file handling.
//!
//! Every error here is returned to the caller as a value. Edit errors
//! (`DuplicateName`, `ConnectionRejected`, `InvalidAttribute`, ...) mean the
//! operation was rejected and the graph is unchanged. Load errors
//! (`MalformedDocument`, `DanglingReference`) mean no graph was produced.

use std::fmt;

use crate::topology::NodeType;

/// Convenience alias used throughout the crate
pub type Result<T, E = TopologyError> = std::result::Result<T, E>;

/// Why a connect request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Both endpoints are the same node
    SelfLoop,
    /// An edge between the two nodes already exists
    AlreadyConnected,
    /// The node types may not be linked
    IncompatibleTypes(NodeType, NodeType),
    /// An explicit interface binding does not fit the endpoint
    InvalidBinding(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SelfLoop => write!(f, "a node cannot be linked to itself"),
            RejectReason::AlreadyConnected => write!(f, "the nodes are already linked"),
            RejectReason::IncompatibleTypes(a, b) => {
                write!(f, "{} and {} cannot be linked", a, b)
            }
            RejectReason::InvalidBinding(msg) => write!(f, "invalid interface binding: {}", msg),
        }
    }
}

/// Errors produced by the topology core
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("A node named '{0}' already exists")]
    DuplicateName(String),
    #[error("No node named '{0}'")]
    NodeNotFound(String),
    #[error("Invalid node name '{0}'")]
    InvalidName(String),
    #[error("Cannot connect '{u}' to '{v}': {reason}")]
    ConnectionRejected {
        u: String,
        v: String,
        reason: RejectReason,
    },
    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidAttribute {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("No more {0} identifiers available")]
    IdentifierExhausted(&'static str),
    #[error("Malformed topology document: {0}")]
    MalformedDocument(String),
    #[error("Unresolved reference in topology document: {0}")]
    DanglingReference(String),
    #[error("Invalid editor settings: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TopologyError {
    /// True for errors that mean a file could not be turned into a graph
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            TopologyError::MalformedDocument(_)
                | TopologyError::DanglingReference(_)
                | TopologyError::Json(_)
        )
    }

    pub(crate) fn invalid_attribute(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TopologyError::InvalidAttribute {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn rejected(u: &str, v: &str, reason: RejectReason) -> Self {
        TopologyError::ConnectionRejected {
            u: u.to_string(),
            v: v.to_string(),
            reason,
        }
    }
}
