#![forbid(unsafe_code)]

//! Per-column attribute sync.
//!
//! When a column's own traits change, its values are pushed into the
//! rendered styles without rebuilding the group: padding, background and
//! alignment are merged into the content-cell style, and alignment into the
//! column wrapper. Every other style property is left where it was.
//!
//! Values that differ from the group's are marked with an override
//! attribute, so the next group rebuild keeps them instead of resetting the
//! column to the group's values.
//!
//! The MSO fallback block is not touched here; it catches up on the group's
//! next rebuild.

use mailframe_core::{NodeId, StyleMap, TreeHost};
use tracing::{debug_span, trace};

use crate::config::{
    ATTR_ALIGN_OVERRIDE, ATTR_BACKGROUND_OVERRIDE, ATTR_PADDING_OVERRIDE, COLUMN, COLUMN_GROUP,
    ColumnConfig, GroupConfig,
};
use crate::markup::merge_cell_values;
use crate::reconcile::ColumnLayout;

/// Transient property set on a column while its attributes are applied.
pub const PROP_APPLYING: &str = "applying-attributes";

/// Why an attribute sync did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplySkip {
    /// The column is already being applied further up the stack.
    Reentrant,
    /// The enclosing group is mid-rebuild.
    GroupRebuilding,
    /// The node is not a column.
    NotAColumn,
    /// The column has no content cell to style.
    MissingContentCell,
}

/// Result of an attribute sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing was examined.
    Skipped(ApplySkip),
    /// Styles already matched; nothing was written.
    Unchanged,
    /// At least one attribute was written.
    Applied,
}

impl ColumnLayout {
    /// Whether `column` is mid-apply.
    #[must_use]
    pub fn is_applying<H: TreeHost>(host: &H, column: NodeId) -> bool {
        host.property(column, PROP_APPLYING).is_some()
    }

    /// Push `column`'s padding, background and alignment into its rendered
    /// styles, clearing the apply guard before returning.
    pub fn apply_column_attributes<H: TreeHost>(
        &self,
        host: &mut H,
        column: NodeId,
    ) -> ApplyOutcome {
        let outcome = self.apply_column_attributes_deferred(host, column);
        if outcome == ApplyOutcome::Applied {
            Self::finish_apply(host, column);
        }
        outcome
    }

    /// Like [`apply_column_attributes`](Self::apply_column_attributes), but
    /// leaves the apply guard set after writing so the caller can drain the
    /// host's notifications first. Pair with
    /// [`finish_apply`](Self::finish_apply).
    pub fn apply_column_attributes_deferred<H: TreeHost>(
        &self,
        host: &mut H,
        column: NodeId,
    ) -> ApplyOutcome {
        if !host.is_kind(column, &COLUMN) {
            return ApplyOutcome::Skipped(ApplySkip::NotAColumn);
        }
        if Self::is_applying(host, column) {
            trace!(column = %column, "apply skipped: already applying");
            return ApplyOutcome::Skipped(ApplySkip::Reentrant);
        }
        let group = host.closest(column, &COLUMN_GROUP);
        if group.is_some_and(|g| Self::is_rebuilding(host, g)) {
            trace!(column = %column, "apply skipped: group rebuilding");
            return ApplyOutcome::Skipped(ApplySkip::GroupRebuilding);
        }
        let Some(cell) = Self::content_cell(host, column) else {
            trace!(column = %column, "apply skipped: no content cell");
            return ApplyOutcome::Skipped(ApplySkip::MissingContentCell);
        };

        let group_config = match group {
            Some(g) => self.config(host, g),
            None => GroupConfig::seed(self.policy()),
        };
        let values = ColumnConfig::read(host, column, &group_config);
        let _span = debug_span!(
            "column.apply_attributes",
            column = %column,
            padding_px = values.padding_px,
            align = %values.vertical_align,
        )
        .entered();

        host.set_property(column, PROP_APPLYING, Some("1"));
        let mut changed = false;

        let mut cell_style = StyleMap::parse(host.attribute(cell, "style").unwrap_or_default());
        merge_cell_values(
            &mut cell_style,
            values.padding_px,
            values.vertical_align,
            values.background.as_deref(),
        );
        changed |= write_style(host, cell, &cell_style);

        let mut wrapper_style =
            StyleMap::parse(host.attribute(column, "style").unwrap_or_default());
        wrapper_style.set("vertical-align", values.vertical_align.as_str());
        changed |= write_style(host, column, &wrapper_style);

        let align = values.vertical_align.as_str();
        let padding = values.padding_px.to_string();
        let background = values.background.as_deref().unwrap_or_default();
        changed |= write_marker(
            host,
            column,
            ATTR_ALIGN_OVERRIDE,
            (values.vertical_align != group_config.vertical_align).then_some(align),
        );
        changed |= write_marker(
            host,
            column,
            ATTR_PADDING_OVERRIDE,
            (values.padding_px != group_config.padding_px).then_some(padding.as_str()),
        );
        changed |= write_marker(
            host,
            column,
            ATTR_BACKGROUND_OVERRIDE,
            (values.background != group_config.background).then_some(background),
        );

        if changed {
            ApplyOutcome::Applied
        } else {
            Self::finish_apply(host, column);
            ApplyOutcome::Unchanged
        }
    }

    /// Clear the apply guard on `column`.
    pub fn finish_apply<H: TreeHost>(host: &mut H, column: NodeId) {
        host.set_property(column, PROP_APPLYING, None);
    }
}

/// Set the override marker `name` to `value`, or remove it for `None`.
/// Returns whether anything was written.
fn write_marker<H: TreeHost>(
    host: &mut H,
    node: NodeId,
    name: &str,
    value: Option<&str>,
) -> bool {
    match value {
        None => host.remove_attribute(node, name),
        Some(value) if host.attribute(node, name) == Some(value) => false,
        Some(value) => host.set_attribute(node, name, value),
    }
}

/// Write `style` to `node` if it differs from what is there.
fn write_style<H: TreeHost>(host: &mut H, node: NodeId, style: &StyleMap) -> bool {
    let css = style.to_css();
    if host.attribute(node, "style") == Some(css.as_str()) {
        return false;
    }
    host.set_attribute(node, "style", &css)
}
