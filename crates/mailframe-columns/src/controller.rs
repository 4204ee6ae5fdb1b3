#![forbid(unsafe_code)]

//! Event-driven glue between the host's notifications and the layout.
//!
//! [`ColumnEditor`] is what the host wires up: it drains [`HostEvent`]s,
//! debounces attribute edits per node, runs reconcile and attribute sync
//! when their quiet windows elapse, and routes selections.
//!
//! # Guard lifetime
//!
//! Mutations made by a rebuild or an attribute sync are echoed back as
//! notifications. The controller therefore runs those operations in their
//! deferred form and only clears the guards once the host's queue has
//! drained, so the echoes are seen (and ignored) while the guard is still
//! up.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use mailframe_columns::{ColumnEditor, column_group_block};
//! use mailframe_core::{Document, TreeHost};
//! use web_time::Instant;
//!
//! let mut doc = Document::new();
//! let mut editor = ColumnEditor::default();
//! let t0 = Instant::now();
//!
//! let root = doc.root();
//! let group = doc.append_child(root, column_group_block(editor.layout().policy())).unwrap();
//! editor.handle_events(&mut doc, t0);
//! assert_eq!(mailframe_columns::ColumnLayout::columns(&doc, group).len(), 2);
//!
//! doc.set_attribute(group, "data-column-count", "3");
//! editor.handle_events(&mut doc, t0);
//! editor.tick(&mut doc, t0 + Duration::from_millis(200));
//! assert_eq!(mailframe_columns::ColumnLayout::columns(&doc, group).len(), 3);
//! ```

use mailframe_core::{Debouncer, HostEvent, HostEvents, NodeId, TreeHost};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::column_attrs::ApplyOutcome;
use crate::config::{COLUMN, COLUMN_GROUP};
use crate::policy::LayoutPolicy;
use crate::reconcile::{ColumnLayout, ReconcileOutcome};
use crate::selection::route_selection;

/// Upper bound on drain rounds per call. Each round handles the echoes of
/// the previous one; a well-behaved host settles in two or three.
const MAX_DRAIN_ROUNDS: usize = 64;

/// Work waiting for its debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingWork {
    /// Reconcile a column group.
    Reconcile(NodeId),
    /// Sync a column's own attributes.
    ApplyColumn(NodeId),
}

impl PendingWork {
    /// Node the work targets.
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            Self::Reconcile(node) | Self::ApplyColumn(node) => node,
        }
    }
}

/// Something the controller ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completed {
    /// A group reconcile ran.
    Reconciled {
        /// The group.
        group: NodeId,
        /// What it did.
        outcome: ReconcileOutcome,
    },
    /// A column attribute sync ran.
    Applied {
        /// The column.
        column: NodeId,
        /// What it did.
        outcome: ApplyOutcome,
    },
}

/// Guards left up by deferred operations, cleared once the queue drains.
#[derive(Debug, Default)]
struct Settling {
    groups: Vec<NodeId>,
    columns: Vec<NodeId>,
}

/// Host-facing controller for column groups.
#[derive(Debug, Default)]
pub struct ColumnEditor {
    layout: ColumnLayout,
    debounce: Debouncer<PendingWork>,
    settling: Settling,
}

impl ColumnEditor {
    /// Controller with the given policy.
    #[must_use]
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            layout: ColumnLayout::new(policy),
            ..Self::default()
        }
    }

    /// The layout operations this controller drives.
    #[must_use]
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Whether `work` is waiting for its window.
    #[must_use]
    pub fn is_pending(&self, work: PendingWork) -> bool {
        self.debounce.is_pending(&work)
    }

    /// When [`tick`](Self::tick) next has something to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.next_deadline()
    }

    /// Drain and handle every queued notification, including the echoes of
    /// work done while handling them, then clear settled guards.
    ///
    /// If the queue has not emptied after `MAX_DRAIN_ROUNDS`, the guards
    /// stay up and are cleared by a later call that drains it.
    ///
    /// Returns the number of notifications seen.
    pub fn handle_events<H>(&mut self, host: &mut H, now: Instant) -> usize
    where
        H: TreeHost + HostEvents,
    {
        let mut seen = 0;
        let mut rounds = 0;
        while host.has_pending_events() {
            if rounds == MAX_DRAIN_ROUNDS {
                warn!(rounds, "host notifications did not settle; deferring the rest");
                return seen;
            }
            rounds += 1;
            for event in host.drain_events() {
                seen += 1;
                self.dispatch(host, event, now);
            }
        }
        self.settle(host);
        seen
    }

    /// Run every debounced operation whose window has elapsed at `now`.
    pub fn tick<H>(&mut self, host: &mut H, now: Instant) -> Vec<Completed>
    where
        H: TreeHost + HostEvents,
    {
        let due = self.debounce.take_due(now);
        if due.is_empty() {
            return Vec::new();
        }
        let mut done = Vec::with_capacity(due.len());
        for work in due {
            match work {
                PendingWork::Reconcile(group) => {
                    let outcome = self.layout.reconcile_deferred(host, group);
                    if outcome.is_rebuilt() {
                        self.settling.groups.push(group);
                    }
                    done.push(Completed::Reconciled { group, outcome });
                }
                PendingWork::ApplyColumn(column) => {
                    let outcome = self.layout.apply_column_attributes_deferred(host, column);
                    if outcome == ApplyOutcome::Applied {
                        self.settling.columns.push(column);
                    }
                    done.push(Completed::Applied { column, outcome });
                }
            }
        }
        self.handle_events(host, now);
        done
    }

    fn dispatch<H: TreeHost>(&mut self, host: &mut H, event: HostEvent, now: Instant) {
        match event {
            HostEvent::NodeAdded { node } => {
                if host.is_kind(node, &COLUMN_GROUP) {
                    debug!(group = %node, "column group added");
                    self.layout.seed(host, node);
                    if self.layout.reconcile_deferred(host, node).is_rebuilt() {
                        self.settling.groups.push(node);
                    }
                }
            }
            HostEvent::AttributesChanged { node, .. } => self.on_attributes_changed(host, node, now),
            HostEvent::NodeSelected { node } => {
                match route_selection(host, node) {
                    Some(target) if target != node => {
                        trace!(from = %node, to = %target, "selection rerouted");
                        host.select(target);
                    }
                    _ => {}
                }
            }
            HostEvent::NodeRemoved { node } => {
                trace!(node = %node, "node removed");
                self.debounce.cancel_where(|work| !host.contains(work.node()));
            }
        }
    }

    fn on_attributes_changed<H: TreeHost>(&mut self, host: &H, node: NodeId, now: Instant) {
        if host.is_kind(node, &COLUMN_GROUP) {
            if ColumnLayout::is_rebuilding(host, node) {
                trace!(group = %node, "attribute echo ignored during rebuild");
                return;
            }
            self.debounce.schedule(
                PendingWork::Reconcile(node),
                now,
                self.layout.policy().group_debounce(),
            );
        } else if host.is_kind(node, &COLUMN) {
            let group_rebuilding = host
                .closest(node, &COLUMN_GROUP)
                .is_some_and(|g| ColumnLayout::is_rebuilding(host, g));
            if group_rebuilding || ColumnLayout::is_applying(host, node) {
                trace!(column = %node, "attribute echo ignored");
                return;
            }
            self.debounce.schedule(
                PendingWork::ApplyColumn(node),
                now,
                self.layout.policy().column_debounce(),
            );
        }
    }

    fn settle<H: TreeHost>(&mut self, host: &mut H) {
        for group in self.settling.groups.drain(..) {
            ColumnLayout::finish_rebuild(host, group);
        }
        for column in self.settling.columns.drain(..) {
            ColumnLayout::finish_apply(host, column);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::block::column_group_block;
    use crate::config::{ATTR_BACKGROUND, ATTR_COUNT, ATTR_PADDING};
    use mailframe_core::Document;
    use tracing_test::traced_test;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn dropped_group(editor: &mut ColumnEditor, doc: &mut Document, t0: Instant) -> NodeId {
        let root = doc.root();
        let group = doc
            .append_child(root, column_group_block(editor.layout().policy()))
            .unwrap();
        editor.handle_events(doc, t0);
        group
    }

    #[test]
    fn dropping_a_group_builds_it_and_schedules_nothing() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);

        assert_eq!(ColumnLayout::columns(&doc, group).len(), 2);
        assert!(!ColumnLayout::is_rebuilding(&doc, group));
        assert_eq!(editor.next_deadline(), None);
        assert!(!doc.has_pending_events());
    }

    #[test]
    fn burst_of_edits_reconciles_once() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);

        for (i, count) in ["3", "4", "1", "3"].into_iter().enumerate() {
            doc.set_attribute(group, ATTR_COUNT, count);
            editor.handle_events(&mut doc, t0 + ms(i as u64 * 50));
        }
        assert!(editor.is_pending(PendingWork::Reconcile(group)));
        assert!(editor.tick(&mut doc, t0 + ms(200)).is_empty());

        let done = editor.tick(&mut doc, t0 + ms(300));
        assert_eq!(
            done,
            vec![Completed::Reconciled {
                group,
                outcome: ReconcileOutcome::Rebuilt {
                    columns: 3,
                    dropped: vec![]
                }
            }]
        );
        assert_eq!(ColumnLayout::columns(&doc, group).len(), 3);
        assert_eq!(editor.next_deadline(), None);
    }

    #[test]
    fn rebuild_echoes_do_not_reschedule() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);

        doc.set_attribute(group, ATTR_BACKGROUND, "#eeeeee");
        editor.handle_events(&mut doc, t0);
        editor.tick(&mut doc, t0 + ms(150));
        assert_eq!(editor.next_deadline(), None);
        assert!(!ColumnLayout::is_rebuilding(&doc, group));
    }

    #[test]
    fn column_edit_applies_without_rebuild() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);
        let columns = ColumnLayout::columns(&doc, group);

        doc.set_attribute(columns[0], ATTR_PADDING, "5");
        editor.handle_events(&mut doc, t0);
        assert!(editor.is_pending(PendingWork::ApplyColumn(columns[0])));
        assert!(!editor.is_pending(PendingWork::Reconcile(group)));

        let done = editor.tick(&mut doc, t0 + ms(100));
        assert_eq!(
            done,
            vec![Completed::Applied {
                column: columns[0],
                outcome: ApplyOutcome::Applied
            }]
        );
        assert_eq!(ColumnLayout::columns(&doc, group), columns);
        assert!(!ColumnLayout::is_applying(&doc, columns[0]));
        assert_eq!(editor.next_deadline(), None);
    }

    #[test]
    fn selection_is_routed_to_column() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);
        let column = ColumnLayout::columns(&doc, group)[1];
        let cell = ColumnLayout::content_cell(&doc, column).unwrap();

        doc.select(cell);
        editor.handle_events(&mut doc, t0);
        assert_eq!(doc.selected(), Some(column));
    }

    #[test]
    fn removing_a_group_cancels_its_work() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);
        let column = ColumnLayout::columns(&doc, group)[0];

        doc.set_attribute(group, ATTR_COUNT, "3");
        doc.set_attribute(column, ATTR_PADDING, "1");
        editor.handle_events(&mut doc, t0);
        assert!(editor.next_deadline().is_some());

        doc.remove(group);
        editor.handle_events(&mut doc, t0);
        assert_eq!(editor.next_deadline(), None);
        assert!(editor.tick(&mut doc, t0 + ms(500)).is_empty());
    }

    #[traced_test]
    #[test]
    fn shrinking_logs_dropped_columns() {
        let t0 = Instant::now();
        let mut doc = Document::new();
        let mut editor = ColumnEditor::default();
        let group = dropped_group(&mut editor, &mut doc, t0);

        doc.set_attribute(group, ATTR_COUNT, "1");
        editor.handle_events(&mut doc, t0);
        editor.tick(&mut doc, t0 + ms(150));
        assert!(logs_contain("column content dropped on shrink"));
        assert!(logs_contain("column_group.reconcile"));
    }
}
