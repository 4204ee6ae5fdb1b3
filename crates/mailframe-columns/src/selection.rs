#![forbid(unsafe_code)]

//! Selection routing.
//!
//! Structural wrapper nodes and content cells are not selectable. A click
//! that lands on one is redirected to the nearest Column or ColumnGroup so
//! the trait panel always has something meaningful to show.

use mailframe_core::{NodeId, TreeHost};

use crate::config::{COLUMN, COLUMN_GROUP};

/// Where a selection of `node` should end up.
///
/// - Selectable nodes stay selected.
/// - Otherwise the nearest ancestor that is a Column or ColumnGroup.
/// - Outside any group, the nearest selectable ancestor, or `None`.
#[must_use]
pub fn route_selection<H: TreeHost>(host: &H, node: NodeId) -> Option<NodeId> {
    if !host.contains(node) {
        return None;
    }
    if host.flags(node).is_selectable() {
        return Some(node);
    }
    let ancestors = host.ancestors(node);
    ancestors
        .iter()
        .copied()
        .find(|&id| host.is_kind(id, &COLUMN) || host.is_kind(id, &COLUMN_GROUP))
        .or_else(|| {
            ancestors
                .into_iter()
                .find(|&id| host.flags(id).is_selectable())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ATTR_COUNT;
    use crate::reconcile::ColumnLayout;
    use mailframe_core::{ComponentKind, Document, NodeFlags, NodeSpec};

    #[test]
    fn routes_wrapper_clicks_to_group_and_cell_clicks_to_column() {
        let mut doc = Document::new();
        let root = doc.root();
        let group = doc
            .append_child(root, NodeSpec::new(COLUMN_GROUP, "div").attr(ATTR_COUNT, "2"))
            .unwrap();
        ColumnLayout::default().reconcile(&mut doc, group);

        let table = doc.children(group)[0];
        assert_eq!(route_selection(&doc, table), Some(group));

        let column = ColumnLayout::columns(&doc, group)[1];
        let cell = ColumnLayout::content_cell(&doc, column).unwrap();
        assert_eq!(route_selection(&doc, cell), Some(column));
        assert_eq!(route_selection(&doc, column), Some(column));
    }

    #[test]
    fn selectable_content_is_left_alone() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc
            .append_child(root, NodeSpec::new(ComponentKind::TEXT, "p"))
            .unwrap();
        assert_eq!(route_selection(&doc, p), Some(p));
    }

    #[test]
    fn outside_groups_falls_back_to_selectable_ancestor() {
        let mut doc = Document::new();
        let root = doc.root();
        let section = doc
            .append_child(root, NodeSpec::new(ComponentKind::DEFAULT, "section"))
            .unwrap();
        let spacer = doc
            .append_child(
                section,
                NodeSpec::new(ComponentKind::DEFAULT, "div").flags(NodeFlags::STRUCTURAL),
            )
            .unwrap();
        assert_eq!(route_selection(&doc, spacer), Some(section));

        let orphan = doc
            .append_child(root, NodeSpec::new(ComponentKind::DEFAULT, "div").flags(NodeFlags::STRUCTURAL))
            .unwrap();
        assert_eq!(route_selection(&doc, orphan), None);
        assert_eq!(route_selection(&doc, NodeId::new(999)), None);
    }
}
