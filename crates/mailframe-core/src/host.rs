#![forbid(unsafe_code)]

//! The host tree port.
//!
//! Plugins never see the editor widget's object model. They see
//! [`TreeHost`]: a small, closed interface over kinds, attributes, children
//! and selection. The real widget binding is one adapter;
//! [`Document`](crate::Document) is the in-memory one used by the CLI and
//! tests.
//!
//! # Invariants
//!
//! - Every live node except the root has exactly one parent.
//! - A detached node keeps its id and subtree until it is attached again or
//!   removed.
//! - Operations on unknown ids are no-ops returning `None`/`false`/empty.

use crate::flags::NodeFlags;
use crate::kind::ComponentKind;
use crate::node::{NodeId, NodeSpec};

/// Generic tree-editing operations supplied by the host editor.
pub trait TreeHost {
    /// The document root.
    fn root(&self) -> NodeId;

    /// Whether `node` is alive (attached or detached).
    fn contains(&self, node: NodeId) -> bool;

    /// Component kind of `node`.
    fn kind(&self, node: NodeId) -> Option<&ComponentKind>;

    /// HTML tag of `node`.
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// Interaction flags of `node`. Unknown nodes report no flags.
    fn flags(&self, node: NodeId) -> NodeFlags;

    /// Parent of `node`, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node`, in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Text of a text node, or the markup of a raw node.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Attribute value.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Every attribute, in insertion order.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    /// Write an attribute. Returns `true` if the node exists. The host
    /// notifies even when the value is unchanged.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool;

    /// Delete an attribute. Returns `true` if it existed.
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool;

    /// Transient model property. Properties never reach the markup and
    /// never raise notifications.
    fn property(&self, node: NodeId, key: &str) -> Option<&str>;

    /// Set (`Some`) or clear (`None`) a transient property.
    fn set_property(&mut self, node: NodeId, key: &str, value: Option<&str>);

    /// Create a node from `spec` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, spec: NodeSpec) -> Option<NodeId>;

    /// Unlink `node` from its parent, keeping it alive.
    fn detach(&mut self, node: NodeId) -> bool;

    /// Append a detached node under `parent`.
    fn attach(&mut self, parent: NodeId, node: NodeId) -> bool;

    /// Destroy `node` and its whole subtree.
    fn remove(&mut self, node: NodeId);

    /// Make `node` the active selection.
    fn select(&mut self, node: NodeId);

    /// The active selection.
    fn selected(&self) -> Option<NodeId>;

    /// Destroy every child of `parent`.
    fn remove_children(&mut self, parent: NodeId) {
        for child in self.children(parent) {
            self.remove(child);
        }
    }

    /// Whether `node` has the given kind.
    fn is_kind(&self, node: NodeId, kind: &ComponentKind) -> bool {
        self.kind(node) == Some(kind)
    }

    /// `node`'s ancestors, nearest first.
    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// Nearest ancestor (excluding `node`) of the given kind.
    fn closest(&self, node: NodeId, kind: &ComponentKind) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|&id| self.is_kind(id, kind))
    }

    /// Descendants of `root` (excluding it) matching `pred`, in document
    /// order.
    fn find_descendants<F>(&self, root: NodeId, mut pred: F) -> Vec<NodeId>
    where
        Self: Sized,
        F: FnMut(&Self, NodeId) -> bool,
    {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            if pred(self, id) {
                out.push(id);
            }
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Children of `node` with the given kind.
    fn children_of_kind(&self, node: NodeId, kind: &ComponentKind) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|&id| self.is_kind(id, kind))
            .collect()
    }
}
