#![forbid(unsafe_code)]

//! Node identifiers and creation specs.

use std::fmt;

use crate::flags::NodeFlags;
use crate::kind::ComponentKind;

/// Stable identifier of a node inside a host tree.
///
/// Ids are never reused while the host is alive, so an id held across a
/// rebuild either still names the same node or names nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create an id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything needed to append a new node: kind, tag, attributes, flags and
/// optional text.
///
/// # Example
///
/// ```
/// use mailframe_core::{ComponentKind, NodeFlags, NodeSpec};
///
/// let spec = NodeSpec::new(ComponentKind::TABLE, "table")
///     .attr("role", "presentation")
///     .flags(NodeFlags::STRUCTURAL);
/// assert_eq!(spec.tag.as_deref(), Some("table"));
/// assert_eq!(spec.attributes.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSpec {
    /// Component kind.
    pub kind: ComponentKind,
    /// HTML tag; `None` for text and raw nodes.
    pub tag: Option<String>,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Interaction flags.
    pub flags: NodeFlags,
    /// Text for text nodes, verbatim markup for raw nodes.
    pub text: Option<String>,
}

impl NodeSpec {
    /// Element node.
    #[must_use]
    pub fn new(kind: ComponentKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Tagless text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::TEXT,
            tag: None,
            text: Some(content.into()),
            ..Self::default()
        }
    }

    /// Verbatim markup block. Raw nodes are inert.
    #[must_use]
    pub fn raw(markup: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::RAW,
            tag: None,
            flags: NodeFlags::STRUCTURAL,
            text: Some(markup.into()),
            ..Self::default()
        }
    }

    /// Add an attribute, replacing an earlier one with the same name.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Set the interaction flags.
    #[must_use]
    pub fn flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
