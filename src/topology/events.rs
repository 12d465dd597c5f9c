//! Change notifications for views of a topology graph.

use std::fmt;

/// A committed change to the graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    NodeAdded { name: String },
    NodeRemoved { name: String },
    NodeRenamed { old: String, new: String },
    /// Attributes, interfaces or position changed
    NodeUpdated { name: String },
    EdgeAdded { u: String, v: String },
    EdgeRemoved { u: String, v: String },
    /// Interface binding of an edge changed
    EdgeUpdated { u: String, v: String },
    /// The whole graph was replaced (new topology or load)
    Reset,
}

/// Callback invoked after every committed mutation
pub type Listener = Box<dyn FnMut(&GraphEvent)>;

/// Registered listeners, called in subscription order
#[derive(Default)]
pub(crate) struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn push(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        log::trace!("Graph event: {:?}", event);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listeners({})", self.listeners.len())
    }
}
