#![forbid(unsafe_code)]

//! Component kinds: the host widget's type tag for each node.

use std::borrow::Cow;
use std::fmt;

/// The component type of a node, as the host widget names it
/// (the `data-gjs-type` of the exported markup).
///
/// Kinds are open-ended: the host can register any number of droppable
/// component types, so this is a string newtype rather than an enum. The
/// constants cover the kinds this crate itself creates or inspects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentKind(Cow<'static, str>);

impl ComponentKind {
    /// Plain element with no special behavior.
    pub const DEFAULT: Self = Self::from_static("default");
    /// Document root.
    pub const WRAPPER: Self = Self::from_static("wrapper");
    /// Editable text block.
    pub const TEXT: Self = Self::from_static("text");
    /// Image.
    pub const IMAGE: Self = Self::from_static("image");
    /// `<table>`.
    pub const TABLE: Self = Self::from_static("table");
    /// `<tr>`.
    pub const ROW: Self = Self::from_static("row");
    /// `<td>`.
    pub const CELL: Self = Self::from_static("cell");
    /// Verbatim markup (conditional comments and the like). Never parsed.
    pub const RAW: Self = Self::from_static("raw");

    /// Kind from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Kind from an owned or borrowed name.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The kind's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nodes of this kind carry verbatim markup instead of children.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        *self == Self::RAW
    }
}

impl Default for ComponentKind {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ComponentKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for ComponentKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_owned_kinds_compare_equal() {
        assert_eq!(ComponentKind::new(String::from("text")), ComponentKind::TEXT);
        assert_eq!(ComponentKind::from("cell"), ComponentKind::CELL);
    }

    #[test]
    fn only_raw_is_raw() {
        assert!(ComponentKind::RAW.is_raw());
        assert!(!ComponentKind::TABLE.is_raw());
        assert_eq!(ComponentKind::default(), ComponentKind::DEFAULT);
    }
}
