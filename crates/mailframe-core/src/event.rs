#![forbid(unsafe_code)]

//! Notifications raised by the host tree.
//!
//! The host fires these for user edits and for mutations made by plugins
//! alike, so handlers must tolerate seeing their own writes echoed back.

use crate::node::NodeId;

/// A notification from the host editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// One or more attributes of `node` were written. Carries the full
    /// attribute set after the write, whether or not anything changed.
    AttributesChanged {
        /// The node written to.
        node: NodeId,
        /// Full attribute set after the write.
        attributes: Vec<(String, String)>,
    },
    /// A newly created node entered the tree.
    NodeAdded {
        /// The new node.
        node: NodeId,
    },
    /// The user (or a plugin) selected a node.
    NodeSelected {
        /// The selected node.
        node: NodeId,
    },
    /// A node and its subtree left the tree for good.
    NodeRemoved {
        /// The removed subtree's root.
        node: NodeId,
    },
}

impl HostEvent {
    /// The node the event concerns.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::AttributesChanged { node, .. }
            | Self::NodeAdded { node }
            | Self::NodeSelected { node }
            | Self::NodeRemoved { node } => *node,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AttributesChanged { .. } => "attributes_changed",
            Self::NodeAdded { .. } => "node_added",
            Self::NodeSelected { .. } => "node_selected",
            Self::NodeRemoved { .. } => "node_removed",
        }
    }
}

/// A host that queues notifications until the caller drains them.
pub trait HostEvents {
    /// Take every queued notification, oldest first.
    fn drain_events(&mut self) -> Vec<HostEvent>;

    /// Whether any notification is queued.
    fn has_pending_events(&self) -> bool;
}
