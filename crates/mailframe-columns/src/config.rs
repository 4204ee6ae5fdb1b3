#![forbid(unsafe_code)]

//! Declarative configuration of a column group and its columns.
//!
//! Configuration lives in plain string attributes written by the trait
//! panel. Every value read is coerced to something renderable, never
//! rejected.

use std::fmt;

use mailframe_core::attr::{parse_color, parse_int, parse_px};
use mailframe_core::{ComponentKind, NodeId, TreeHost};

use crate::policy::LayoutPolicy;

/// Kind of a multi-column section.
pub const COLUMN_GROUP: ComponentKind = ComponentKind::from_static("flexible-columns");
/// Kind of one slot inside a group.
pub const COLUMN: ComponentKind = ComponentKind::from_static("email-column-div");
/// Kind of the cell inside a column that holds the user's content.
pub const COLUMN_CELL: ComponentKind = ComponentKind::from_static("email-column-cell");

/// Group attribute: number of columns.
pub const ATTR_COUNT: &str = "data-column-count";
/// Group and column attribute: vertical alignment.
pub const ATTR_ALIGN: &str = "data-column-align";
/// Group and column attribute: inner padding in pixels.
pub const ATTR_PADDING: &str = "data-column-padding";
/// Group and column attribute: background color.
pub const ATTR_BACKGROUND: &str = "data-bg-color";
/// Column attribute: position within the group.
pub const ATTR_INDEX: &str = "data-column-index";
/// Column attribute: present when the column's alignment was set on the
/// column itself rather than inherited from the group.
pub const ATTR_ALIGN_OVERRIDE: &str = "data-column-align-override";
/// Column attribute: present when the column's padding was set on the
/// column itself.
pub const ATTR_PADDING_OVERRIDE: &str = "data-column-padding-override";
/// Column attribute: present when the column's background was set on the
/// column itself. An empty value records a cleared background.
pub const ATTR_BACKGROUND_OVERRIDE: &str = "data-bg-color-override";

/// Vertical alignment of column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VerticalAlign {
    /// Align to the top (default).
    #[default]
    Top,
    /// Center vertically.
    Middle,
    /// Align to the bottom.
    Bottom,
}

impl VerticalAlign {
    /// Every variant, in panel order.
    pub const ALL: [Self; 3] = [Self::Top, Self::Middle, Self::Bottom];

    /// CSS keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }

    /// Parse a keyword, case-insensitively. `center` is accepted for
    /// `middle`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "middle" | "center" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for VerticalAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a group's configuration, used to detect no-op reconciles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a digest previously produced by [`GroupConfig::fingerprint`].
    #[must_use]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized configuration of a column group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    /// Number of columns, within the policy's range.
    pub column_count: u8,
    /// Default alignment of every column.
    pub vertical_align: VerticalAlign,
    /// Background color of every column, if any.
    pub background: Option<String>,
    /// Padding inside each column.
    pub padding_px: u32,
}

impl GroupConfig {
    /// Read and normalize the group attributes of `group`.
    ///
    /// - Count: non-numeric or missing → policy default; otherwise clamped
    ///   to the policy's range.
    /// - Align: unknown → policy default.
    /// - Background: blank or unsafe → none.
    /// - Padding: missing → policy default; malformed or negative → 0.
    #[must_use]
    pub fn read<H: TreeHost>(host: &H, group: NodeId, policy: &LayoutPolicy) -> Self {
        let column_count = host
            .attribute(group, ATTR_COUNT)
            .map_or(policy.default_columns, |raw| policy.coerce_column_count(raw));
        let vertical_align = host
            .attribute(group, ATTR_ALIGN)
            .and_then(VerticalAlign::parse)
            .unwrap_or(policy.default_align);
        let background = host.attribute(group, ATTR_BACKGROUND).and_then(parse_color);
        let padding_px = host
            .attribute(group, ATTR_PADDING)
            .map_or(policy.default_padding_px, parse_px);
        Self {
            column_count,
            vertical_align,
            background,
            padding_px,
        }
    }

    /// Defaults a freshly dropped group starts with.
    #[must_use]
    pub fn seed(policy: &LayoutPolicy) -> Self {
        Self {
            column_count: policy.default_columns,
            vertical_align: policy.default_align,
            background: None,
            padding_px: policy.default_padding_px,
        }
    }

    /// Number of columns as an index bound.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.column_count)
    }

    /// Stable digest of the four configurable values.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let canonical = format!(
            "{}|{}|{}|{}",
            self.column_count,
            self.vertical_align,
            self.background.as_deref().unwrap_or_default(),
            self.padding_px
        );
        Fingerprint(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }

    /// Attribute form of this config, as written to the group node.
    #[must_use]
    pub fn to_attributes(&self) -> [(&'static str, String); 4] {
        [
            (ATTR_COUNT, self.column_count.to_string()),
            (ATTR_ALIGN, self.vertical_align.as_str().to_owned()),
            (ATTR_PADDING, self.padding_px.to_string()),
            (ATTR_BACKGROUND, self.background.clone().unwrap_or_default()),
        ]
    }
}

/// Per-column values as currently written on a column node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    /// Padding inside the column.
    pub padding_px: u32,
    /// Background color, if any.
    pub background: Option<String>,
    /// Effective alignment.
    pub vertical_align: VerticalAlign,
}

impl ColumnConfig {
    /// Read `column`'s own attributes, inheriting anything missing from
    /// `group`. Malformed padding becomes 0; an unknown alignment inherits.
    #[must_use]
    pub fn read<H: TreeHost>(host: &H, column: NodeId, group: &GroupConfig) -> Self {
        let padding_px = host
            .attribute(column, ATTR_PADDING)
            .map_or(group.padding_px, parse_px);
        let background = match host.attribute(column, ATTR_BACKGROUND) {
            Some(raw) => parse_color(raw),
            None => group.background.clone(),
        };
        let vertical_align = host
            .attribute(column, ATTR_ALIGN)
            .and_then(VerticalAlign::parse)
            .unwrap_or(group.vertical_align);
        Self {
            padding_px,
            background,
            vertical_align,
        }
    }
}

/// Read a column's position attribute. `None` when missing, malformed or
/// negative.
#[must_use]
pub fn column_index<H: TreeHost>(host: &H, column: NodeId) -> Option<usize> {
    host.attribute(column, ATTR_INDEX)
        .and_then(parse_int)
        .and_then(|v| usize::try_from(v).ok())
}
