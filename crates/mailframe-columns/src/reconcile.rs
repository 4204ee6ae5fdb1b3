#![forbid(unsafe_code)]

//! Column layout reconciliation.
//!
//! [`ColumnLayout::reconcile`] keeps a group's table/column markup in step
//! with its declarative attributes while carrying each column's content
//! across rebuilds.
//!
//! # Algorithm
//!
//! 1. Skip if the group is mid-rebuild.
//! 2. Skip if the config fingerprint is unchanged and the column count
//!    already matches.
//! 3. Mark the group `rebuilding`.
//! 4. Detach every column's content into a side table keyed by
//!    `data-column-index`, with its content-cell style and any alignment
//!    override.
//! 5. Clear the group, then rebuild wrapper → fallback → columns, re-attaching
//!    the side table entry for each index in order.
//! 6. Destroy side-table entries past the new count.
//! 7. Cache the fingerprint and (for direct calls) clear `rebuilding`.
//!
//! # Invariants
//!
//! - Settled groups have exactly `column_count` columns, indexed
//!   `0..column_count`.
//! - Content is matched by index only. Shrinking destroys the tail columns'
//!   content; growing back does not bring it back.
//! - An unchanged configuration leaves the tree, and every node id in it,
//!   untouched.

use ahash::AHashMap;
use mailframe_core::attr::{parse_color, parse_px};
use mailframe_core::{ComponentKind, NodeId, StyleMap, TreeHost};
use tracing::{debug, debug_span, trace};

use crate::config::{
    ATTR_ALIGN_OVERRIDE, ATTR_BACKGROUND_OVERRIDE, ATTR_PADDING_OVERRIDE, COLUMN, COLUMN_CELL,
    COLUMN_GROUP, Fingerprint, GroupConfig, VerticalAlign, column_index,
};
use crate::markup::{self, ColumnPlan};
use crate::policy::LayoutPolicy;

/// Transient property set on a group while it is being rebuilt.
pub const PROP_REBUILDING: &str = "rebuilding";
/// Transient property caching the group's last applied fingerprint.
pub const PROP_FINGERPRINT: &str = "config-fingerprint";

/// Why a reconcile did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The group is already being rebuilt further up the stack.
    Reentrant,
    /// The node is not a column group.
    NotAColumnGroup,
}

/// Result of a reconcile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing was examined.
    Skipped(SkipReason),
    /// Configuration unchanged; the tree was not touched.
    Unchanged,
    /// The group was rebuilt.
    Rebuilt {
        /// Columns after the rebuild.
        columns: usize,
        /// Indices whose content was destroyed because they fell past the
        /// new count.
        dropped: Vec<usize>,
    },
}

impl ReconcileOutcome {
    /// Whether the tree was rebuilt.
    #[must_use]
    pub fn is_rebuilt(&self) -> bool {
        matches!(self, Self::Rebuilt { .. })
    }
}

/// One column's state held across a rebuild.
#[derive(Debug, Default)]
struct Preserved {
    content: Vec<NodeId>,
    cell_style: StyleMap,
    align_override: Option<VerticalAlign>,
    padding_override: Option<u32>,
    background_override: Option<Option<String>>,
}

/// The column layout plugin: reconcile, attribute sync and queries over
/// column groups.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    policy: LayoutPolicy,
}

impl ColumnLayout {
    /// Layout with the given policy.
    #[must_use]
    pub fn new(policy: LayoutPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    /// Current normalized config of `group`.
    #[must_use]
    pub fn config<H: TreeHost>(&self, host: &H, group: NodeId) -> GroupConfig {
        GroupConfig::read(host, group, &self.policy)
    }

    /// Whether `group` is mid-rebuild.
    #[must_use]
    pub fn is_rebuilding<H: TreeHost>(host: &H, group: NodeId) -> bool {
        host.property(group, PROP_REBUILDING).is_some()
    }

    /// Fingerprint of the last configuration applied to `group`.
    #[must_use]
    pub fn cached_fingerprint<H: TreeHost>(host: &H, group: NodeId) -> Option<Fingerprint> {
        host.property(group, PROP_FINGERPRINT)
            .map(Fingerprint::from_hex)
    }

    /// Columns belonging to `group` (not to groups nested in its content),
    /// in document order.
    #[must_use]
    pub fn columns<H: TreeHost>(host: &H, group: NodeId) -> Vec<NodeId> {
        host.find_descendants(group, |h, id| {
            h.is_kind(id, &COLUMN) && h.closest(id, &COLUMN_GROUP) == Some(group)
        })
    }

    /// The content cell of `column`, if the column has one.
    #[must_use]
    pub fn content_cell<H: TreeHost>(host: &H, column: NodeId) -> Option<NodeId> {
        host.find_descendants(column, |h, id| {
            h.is_kind(id, &COLUMN_CELL) && h.closest(id, &COLUMN) == Some(column)
        })
        .into_iter()
        .next()
    }

    /// The user content of `column`, in order.
    ///
    /// Without a content cell (a hand-edited tree), every child of the
    /// column except empty table plumbing counts as its content.
    #[must_use]
    pub fn column_content<H: TreeHost>(host: &H, column: NodeId) -> Vec<NodeId> {
        match Self::content_cell(host, column) {
            Some(cell) => host.children(cell),
            None => host
                .children(column)
                .into_iter()
                .filter(|&id| !is_plumbing(host, id))
                .collect(),
        }
    }

    /// Bring `group`'s markup in line with its attributes, clearing the
    /// rebuild guard before returning.
    pub fn reconcile<H: TreeHost>(&self, host: &mut H, group: NodeId) -> ReconcileOutcome {
        let outcome = self.reconcile_deferred(host, group);
        if outcome.is_rebuilt() {
            Self::finish_rebuild(host, group);
        }
        outcome
    }

    /// Like [`reconcile`](Self::reconcile), but leaves the rebuild guard set
    /// after a rebuild so the caller can drain the host's notifications
    /// first. Pair with [`finish_rebuild`](Self::finish_rebuild).
    pub fn reconcile_deferred<H: TreeHost>(&self, host: &mut H, group: NodeId) -> ReconcileOutcome {
        if !host.is_kind(group, &COLUMN_GROUP) {
            return ReconcileOutcome::Skipped(SkipReason::NotAColumnGroup);
        }
        if Self::is_rebuilding(host, group) {
            trace!(group = %group, "reconcile skipped: already rebuilding");
            return ReconcileOutcome::Skipped(SkipReason::Reentrant);
        }

        let config = self.config(host, group);
        let fingerprint = config.fingerprint();
        if Self::cached_fingerprint(host, group).as_ref() == Some(&fingerprint)
            && Self::columns(host, group).len() == config.count()
        {
            trace!(group = %group, "reconcile skipped: configuration unchanged");
            return ReconcileOutcome::Unchanged;
        }

        let _span = debug_span!(
            "column_group.reconcile",
            group = %group,
            columns = config.column_count,
            align = %config.vertical_align,
            padding_px = config.padding_px,
        )
        .entered();

        host.set_property(group, PROP_REBUILDING, Some("1"));
        let mut preserved = Self::preserve(host, group);
        host.remove_children(group);
        self.rebuild(host, group, &config, &mut preserved);

        let mut dropped: Vec<usize> = preserved.keys().copied().collect();
        dropped.sort_unstable();
        for entry in preserved.into_values() {
            for node in entry.content {
                host.remove(node);
            }
        }
        if !dropped.is_empty() {
            debug!(group = %group, ?dropped, "column content dropped on shrink");
        }

        host.set_property(group, PROP_FINGERPRINT, Some(fingerprint.as_str()));
        ReconcileOutcome::Rebuilt {
            columns: config.count(),
            dropped,
        }
    }

    /// Clear the rebuild guard on `group`.
    pub fn finish_rebuild<H: TreeHost>(host: &mut H, group: NodeId) {
        host.set_property(group, PROP_REBUILDING, None);
    }

    /// Detach each column's content into a side table keyed by index.
    fn preserve<H: TreeHost>(host: &mut H, group: NodeId) -> AHashMap<usize, Preserved> {
        let mut table: AHashMap<usize, Preserved> = AHashMap::new();
        for (ordinal, column) in Self::columns(host, group).into_iter().enumerate() {
            let index = column_index(host, column).unwrap_or(ordinal);
            let content = Self::column_content(host, column);
            for &node in &content {
                host.detach(node);
            }
            let cell_style = Self::content_cell(host, column)
                .and_then(|cell| host.attribute(cell, "style"))
                .map(StyleMap::parse)
                .unwrap_or_default();
            let align_override = host
                .attribute(column, ATTR_ALIGN_OVERRIDE)
                .and_then(VerticalAlign::parse);
            let padding_override = host.attribute(column, ATTR_PADDING_OVERRIDE).map(parse_px);
            let background_override = host
                .attribute(column, ATTR_BACKGROUND_OVERRIDE)
                .map(parse_color);

            let entry = table.entry(index).or_default();
            entry.content.extend(content);
            if entry.cell_style.is_empty() {
                entry.cell_style = cell_style;
            }
            entry.align_override = entry.align_override.or(align_override);
            entry.padding_override = entry.padding_override.or(padding_override);
            entry.background_override = entry.background_override.take().or(background_override);
        }
        table
    }

    fn rebuild<H: TreeHost>(
        &self,
        host: &mut H,
        group: NodeId,
        config: &GroupConfig,
        preserved: &mut AHashMap<usize, Preserved>,
    ) {
        let width_px = self.policy.column_width(config.column_count);
        let plans: Vec<(ColumnPlan, Vec<NodeId>)> = (0..config.count())
            .map(|index| {
                let entry = preserved.remove(&index).unwrap_or_default();
                let plan = ColumnPlan {
                    index,
                    width_px,
                    padding_px: entry.padding_override.unwrap_or(config.padding_px),
                    background: entry
                        .background_override
                        .clone()
                        .unwrap_or_else(|| config.background.clone()),
                    vertical_align: entry.align_override.unwrap_or(config.vertical_align),
                    align_overridden: entry.align_override.is_some(),
                    padding_overridden: entry.padding_override.is_some(),
                    background_overridden: entry.background_override.is_some(),
                    cell_style: entry.cell_style,
                };
                (plan, entry.content)
            })
            .collect();

        let Some(table) = host.append_child(group, markup::wrapper_table()) else {
            return;
        };
        let Some(row) = host.append_child(table, markup::structural_row()) else {
            return;
        };
        let Some(outer) = host.append_child(row, markup::outer_cell(&self.policy)) else {
            return;
        };

        let just_plans: Vec<ColumnPlan> = plans.iter().map(|(p, _)| p.clone()).collect();
        host.append_child(outer, markup::fallback_block(&self.policy, &just_plans));

        for (plan, content) in plans {
            let Some(column) = host.append_child(outer, markup::column(&plan)) else {
                continue;
            };
            let cell = host
                .append_child(column, markup::column_table())
                .and_then(|t| host.append_child(t, markup::structural_row()))
                .and_then(|r| host.append_child(r, markup::content_cell(&plan)));
            let target = cell.unwrap_or(column);
            for node in content {
                host.attach(target, node);
            }
        }
    }
}

/// A structural table, row or cell with nothing but more plumbing inside:
/// leftover column markup rather than user content.
fn is_plumbing<H: TreeHost>(host: &H, node: NodeId) -> bool {
    let structural = host.flags(node).is_empty()
        && [ComponentKind::TABLE, ComponentKind::ROW, ComponentKind::CELL]
            .iter()
            .any(|kind| host.is_kind(node, kind));
    structural && host.children(node).iter().all(|&child| is_plumbing(host, child))
}
