#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mailframe_columns::{
    ATTR_ALIGN, ATTR_BACKGROUND, ATTR_COUNT, ATTR_PADDING, ColumnLayout, ReconcileOutcome,
    column_group_block, column_index,
};
use mailframe_core::{ComponentKind, Document, NodeSpec, TreeHost};

#[derive(Debug, Arbitrary)]
enum Edit {
    Count(String),
    Align(String),
    Padding(String),
    Background(String),
    /// Drop a text node into the column at this position (modulo count).
    Drop(u8),
    Reconcile,
}

fuzz_target!(|edits: Vec<Edit>| {
    let mut doc = Document::new();
    let layout = ColumnLayout::default();
    let root = doc.root();
    let Some(group) = doc.append_child(root, column_group_block(layout.policy())) else {
        return;
    };
    layout.reconcile(&mut doc, group);

    for edit in edits.into_iter().take(64) {
        match edit {
            Edit::Count(v) => {
                doc.set_attribute(group, ATTR_COUNT, &v);
            }
            Edit::Align(v) => {
                doc.set_attribute(group, ATTR_ALIGN, &v);
            }
            Edit::Padding(v) => {
                doc.set_attribute(group, ATTR_PADDING, &v);
            }
            Edit::Background(v) => {
                doc.set_attribute(group, ATTR_BACKGROUND, &v);
            }
            Edit::Drop(at) => {
                let columns = ColumnLayout::columns(&doc, group);
                if columns.is_empty() {
                    continue;
                }
                let column = columns[usize::from(at) % columns.len()];
                if let Some(cell) = ColumnLayout::content_cell(&doc, column) {
                    doc.append_child(cell, NodeSpec::new(ComponentKind::TEXT, "p"));
                }
            }
            Edit::Reconcile => {
                layout.reconcile(&mut doc, group);
            }
        }
    }

    layout.reconcile(&mut doc, group);
    let columns = ColumnLayout::columns(&doc, group);
    let expected = layout.config(&doc, group).count();
    assert_eq!(columns.len(), expected);
    for (i, column) in columns.iter().enumerate() {
        assert_eq!(column_index(&doc, *column), Some(i));
    }
    assert!(!ColumnLayout::is_rebuilding(&doc, group));
    assert_eq!(layout.reconcile(&mut doc, group), ReconcileOutcome::Unchanged);
});
