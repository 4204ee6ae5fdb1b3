#![forbid(unsafe_code)]

//! In-memory [`TreeHost`] adapter.
//!
//! An arena of nodes addressed by [`NodeId`]. Slots are never reused, so a
//! stale id simply resolves to nothing. Mutations queue the same
//! notifications the editor widget would fire, and the caller drains them
//! through [`HostEvents`].
//!
//! # Example
//!
//! ```
//! use mailframe_core::{ComponentKind, Document, HostEvents, NodeSpec, TreeHost};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let cell = doc.append_child(root, NodeSpec::new(ComponentKind::CELL, "td")).unwrap();
//! doc.set_attribute(cell, "width", "300");
//!
//! assert_eq!(doc.attribute(cell, "width"), Some("300"));
//! assert_eq!(doc.drain_events().len(), 2); // added + attributes changed
//! ```

use ahash::AHashMap;
use tracing::trace;

use crate::event::{HostEvent, HostEvents};
use crate::flags::NodeFlags;
use crate::host::TreeHost;
use crate::kind::ComponentKind;
use crate::node::{NodeId, NodeSpec};

#[derive(Debug, Clone)]
struct NodeData {
    kind: ComponentKind,
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    flags: NodeFlags,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    properties: AHashMap<String, String>,
}

impl NodeData {
    fn from_spec(spec: NodeSpec) -> Self {
        Self {
            kind: spec.kind,
            tag: spec.tag,
            attributes: spec.attributes,
            flags: spec.flags,
            text: spec.text,
            children: Vec::new(),
            parent: None,
            properties: AHashMap::new(),
        }
    }
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<NodeData>>,
    root: NodeId,
    selected: Option<NodeId>,
    events: Vec<HostEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `<body>` wrapper root.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeData::from_spec(
            NodeSpec::new(ComponentKind::WRAPPER, "body").flags(NodeFlags::DROPPABLE),
        );
        Self {
            slots: vec![Some(root)],
            root: NodeId(0),
            selected: None,
            events: Vec::new(),
        }
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether only the root is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Drop every queued notification.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn next_id(&self) -> NodeId {
        let raw = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        NodeId(raw)
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        candidate == node || self.ancestors(node).contains(&candidate)
    }

    fn notify_attributes(&mut self, node: NodeId) {
        let attributes = self.attributes(node);
        self.events
            .push(HostEvent::AttributesChanged { node, attributes });
    }

    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }
}

impl TreeHost for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn kind(&self, node: NodeId) -> Option<&ComponentKind> {
        self.node(node).map(|n| &n.kind)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.tag.as_deref())
    }

    fn flags(&self, node: NodeId) -> NodeFlags {
        self.node(node).map_or(NodeFlags::empty(), |n| n.flags)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.text.as_deref())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.node(node)
            .map(|n| n.attributes.clone())
            .unwrap_or_default()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let Some(data) = self.node_mut(node) else {
            return false;
        };
        match data.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => data.attributes.push((name.to_owned(), value.to_owned())),
        }
        self.notify_attributes(node);
        true
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        let Some(data) = self.node_mut(node) else {
            return false;
        };
        let before = data.attributes.len();
        data.attributes.retain(|(n, _)| n != name);
        let removed = data.attributes.len() != before;
        if removed {
            self.notify_attributes(node);
        }
        removed
    }

    fn property(&self, node: NodeId, key: &str) -> Option<&str> {
        self.node(node)?.properties.get(key).map(String::as_str)
    }

    fn set_property(&mut self, node: NodeId, key: &str, value: Option<&str>) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        match value {
            Some(v) => {
                data.properties.insert(key.to_owned(), v.to_owned());
            }
            None => {
                data.properties.remove(key);
            }
        }
    }

    fn append_child(&mut self, parent: NodeId, spec: NodeSpec) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.next_id();
        let mut data = NodeData::from_spec(spec);
        data.parent = Some(parent);
        self.slots.push(Some(data));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        self.events.push(HostEvent::NodeAdded { node: id });
        Some(id)
    }

    fn detach(&mut self, node: NodeId) -> bool {
        if node == self.root || self.parent(node).is_none() {
            return false;
        }
        self.unlink(node);
        true
    }

    fn attach(&mut self, parent: NodeId, node: NodeId) -> bool {
        if node == self.root
            || !self.contains(parent)
            || !self.contains(node)
            || self.is_ancestor_or_self(node, parent)
        {
            trace!(parent = %parent, node = %node, "attach refused");
            return false;
        }
        self.unlink(node);
        if let Some(n) = self.node_mut(node) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(node);
        }
        true
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root || !self.contains(node) {
            return;
        }
        self.unlink(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.slots.get_mut(id.0 as usize).and_then(Option::take) {
                stack.extend(data.children);
            }
            if self.selected == Some(id) {
                self.selected = None;
            }
        }
        self.events.push(HostEvent::NodeRemoved { node });
    }

    fn select(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        self.selected = Some(node);
        self.events.push(HostEvent::NodeSelected { node });
    }

    fn selected(&self) -> Option<NodeId> {
        self.selected
    }
}

impl HostEvents for Document {
    fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(doc: &mut Document, parent: NodeId) -> NodeId {
        doc.append_child(parent, NodeSpec::new(ComponentKind::CELL, "td"))
            .expect("parent exists")
    }

    #[test]
    fn append_links_parent_and_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        let b = cell(&mut doc, a);
        assert_eq!(doc.children(root), vec![a]);
        assert_eq!(doc.parent(b), Some(a));
        assert_eq!(doc.ancestors(b), vec![a, root]);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn append_to_unknown_parent_fails() {
        let mut doc = Document::new();
        assert!(doc.append_child(NodeId(99), NodeSpec::text("x")).is_none());
    }

    #[test]
    fn detach_and_attach_preserve_identity_and_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        let b = cell(&mut doc, root);
        let leaf = doc.append_child(a, NodeSpec::text("hi")).unwrap();
        doc.clear_events();

        assert!(doc.detach(a));
        assert_eq!(doc.parent(a), None);
        assert!(doc.contains(leaf));
        assert!(doc.attach(b, a));
        assert_eq!(doc.children(b), vec![a]);
        assert_eq!(doc.children(a), vec![leaf]);
        assert!(!doc.has_pending_events());
    }

    #[tracing_test::traced_test]
    #[test]
    fn attach_refuses_cycles() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        let b = cell(&mut doc, a);
        assert!(!doc.attach(b, a));
        assert!(!doc.attach(a, a));
        assert_eq!(doc.parent(b), Some(a));
        assert!(logs_contain("attach refused"));
    }

    #[test]
    fn remove_destroys_subtree_and_clears_selection() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        let b = cell(&mut doc, a);
        doc.select(b);
        doc.remove(a);
        assert!(!doc.contains(a));
        assert!(!doc.contains(b));
        assert_eq!(doc.selected(), None);
        assert!(doc.children(root).is_empty());
        assert!(matches!(
            doc.drain_events().last(),
            Some(HostEvent::NodeRemoved { node }) if *node == a
        ));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        doc.remove(a);
        let b = cell(&mut doc, root);
        assert_ne!(a, b);
        assert_eq!(doc.attribute(a, "x"), None);
    }

    #[test]
    fn set_attribute_notifies_even_without_change() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        doc.set_attribute(a, "width", "300");
        doc.clear_events();
        doc.set_attribute(a, "width", "300");
        let events = doc.drain_events();
        assert_eq!(
            events,
            vec![HostEvent::AttributesChanged {
                node: a,
                attributes: vec![("width".into(), "300".into())],
            }]
        );
    }

    #[test]
    fn properties_are_silent_and_not_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        doc.clear_events();
        doc.set_property(a, "rebuilding", Some("1"));
        assert_eq!(doc.property(a, "rebuilding"), Some("1"));
        assert!(doc.attributes(a).is_empty());
        doc.set_property(a, "rebuilding", None);
        assert_eq!(doc.property(a, "rebuilding"), None);
        assert!(!doc.has_pending_events());
    }

    #[test]
    fn find_descendants_is_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = cell(&mut doc, root);
        let a1 = cell(&mut doc, a);
        let b = cell(&mut doc, root);
        let found = doc.find_descendants(root, |h, id| h.is_kind(id, &ComponentKind::CELL));
        assert_eq!(found, vec![a, a1, b]);
        assert_eq!(doc.closest(a1, &ComponentKind::WRAPPER), Some(root));
    }

    #[test]
    fn remove_children_empties_parent() {
        let mut doc = Document::new();
        let root = doc.root();
        cell(&mut doc, root);
        cell(&mut doc, root);
        doc.remove_children(root);
        assert!(doc.children(root).is_empty());
        assert!(doc.is_empty());
    }
}
