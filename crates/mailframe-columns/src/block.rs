#![forbid(unsafe_code)]

//! The "Columns (1-4)" block as it lands on the canvas.

use mailframe_core::{NodeFlags, NodeId, NodeSpec, TreeHost};

use crate::config::{COLUMN_GROUP, GroupConfig};
use crate::policy::LayoutPolicy;
use crate::reconcile::ColumnLayout;

/// Block-panel category of the column block.
pub const BLOCK_CATEGORY: &str = "Structure";
/// Block-panel label of the column block.
pub const BLOCK_LABEL: &str = "Columns (1-4)";

/// Spec of a freshly dropped column group, seeded with the policy's
/// defaults. Columns appear on its first reconcile.
#[must_use]
pub fn column_group_block(policy: &LayoutPolicy) -> NodeSpec {
    GroupConfig::seed(policy)
        .to_attributes()
        .into_iter()
        .fold(NodeSpec::new(COLUMN_GROUP, "div"), |spec, (name, value)| {
            spec.attr(name, value)
        })
        .flags(NodeFlags::CONTENT)
}

impl ColumnLayout {
    /// Write the policy defaults for any group attribute `group` is missing.
    /// Attributes already present, even malformed ones, are left for
    /// reconcile to coerce. Returns whether anything was written.
    pub fn seed<H: TreeHost>(&self, host: &mut H, group: NodeId) -> bool {
        if !host.is_kind(group, &COLUMN_GROUP) {
            return false;
        }
        let mut wrote = false;
        for (name, value) in GroupConfig::seed(self.policy()).to_attributes() {
            if host.attribute(group, name).is_none() {
                wrote |= host.set_attribute(group, name, &value);
            }
        }
        wrote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ATTR_ALIGN, ATTR_BACKGROUND, ATTR_COUNT, ATTR_PADDING};
    use mailframe_core::Document;

    #[test]
    fn block_is_listed_under_structure() {
        assert_eq!(BLOCK_CATEGORY, "Structure");
        assert_eq!(BLOCK_LABEL, "Columns (1-4)");
    }

    #[test]
    fn block_is_seeded_with_defaults() {
        let spec = column_group_block(&LayoutPolicy::default());
        assert_eq!(spec.kind, COLUMN_GROUP);
        let attrs: Vec<(&str, &str)> = spec
            .attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            attrs,
            vec![
                (ATTR_COUNT, "2"),
                (ATTR_ALIGN, "top"),
                (ATTR_PADDING, "20"),
                (ATTR_BACKGROUND, ""),
            ]
        );
        assert!(spec.flags.is_selectable());
        assert!(!spec.flags.contains(NodeFlags::DROPPABLE));
    }

    #[test]
    fn seed_fills_only_missing_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let group = doc
            .append_child(root, NodeSpec::new(COLUMN_GROUP, "div").attr(ATTR_COUNT, "junk"))
            .unwrap();
        let layout = ColumnLayout::default();
        assert!(layout.seed(&mut doc, group));
        assert_eq!(doc.attribute(group, ATTR_COUNT), Some("junk"));
        assert_eq!(doc.attribute(group, ATTR_ALIGN), Some("top"));
        assert_eq!(doc.attribute(group, ATTR_PADDING), Some("20"));
        assert_eq!(doc.attribute(group, ATTR_BACKGROUND), Some(""));
        assert!(!layout.seed(&mut doc, group));
        assert!(!layout.seed(&mut doc, root));
    }
}
