#![forbid(unsafe_code)]

//! Interaction flags the host editor honors per node.

use bitflags::bitflags;

bitflags! {
    /// What the user may do with a node inside the visual editor.
    ///
    /// Structural plumbing (wrapper tables, rows, outer cells) carries
    /// [`NodeFlags::STRUCTURAL`] so clicks, drags and the layer manager skip
    /// it and land on the nodes the user actually edits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Clicking the node selects it.
        const SELECTABLE = 0b0000_0001;
        /// Hover highlighting.
        const HOVERABLE  = 0b0000_0010;
        /// The node can be dragged elsewhere.
        const DRAGGABLE  = 0b0000_0100;
        /// Other nodes can be dropped into it.
        const DROPPABLE  = 0b0000_1000;
        /// Listed in the layer manager.
        const LAYERABLE  = 0b0001_0000;
        /// Can be duplicated.
        const COPYABLE   = 0b0010_0000;
        /// Can be deleted by the user.
        const REMOVABLE  = 0b0100_0000;
    }
}

impl NodeFlags {
    /// Inert plumbing: nothing is allowed.
    pub const STRUCTURAL: Self = Self::empty();

    /// Regular user content: everything except accepting drops.
    pub const CONTENT: Self = Self::SELECTABLE
        .union(Self::HOVERABLE)
        .union(Self::DRAGGABLE)
        .union(Self::LAYERABLE)
        .union(Self::COPYABLE)
        .union(Self::REMOVABLE);

    /// Whether a click on this node may become the active selection.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        self.contains(Self::SELECTABLE)
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::CONTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_nodes_are_not_selectable() {
        assert!(!NodeFlags::STRUCTURAL.is_selectable());
        assert!(!NodeFlags::STRUCTURAL.contains(NodeFlags::DRAGGABLE));
        assert!(!NodeFlags::STRUCTURAL.contains(NodeFlags::LAYERABLE));
    }

    #[test]
    fn content_is_interactive_but_not_a_drop_target() {
        let flags = NodeFlags::default();
        assert!(flags.is_selectable());
        assert!(flags.contains(NodeFlags::DRAGGABLE | NodeFlags::REMOVABLE));
        assert!(!flags.contains(NodeFlags::DROPPABLE));
    }
}
