#![forbid(unsafe_code)]

//! Ordered inline-style maps.
//!
//! Inline `style` attributes are parsed into a [`StyleMap`] once, edited as
//! a property → value mapping, and serialized back only when written to the
//! tree. Property order is first-seen order, so rewriting one property
//! never reshuffles the others.
//!
//! # Parsing rules
//!
//! - Declarations are split on `;`, then on the first `:`.
//! - Names are trimmed and lowercased; values are trimmed.
//! - Empty declarations, missing colons and empty names or values are
//!   skipped.
//! - A repeated property keeps its first position and its last value.
//!
//! # Example
//!
//! ```
//! use mailframe_core::StyleMap;
//!
//! let mut style = StyleMap::parse("padding: 20px ; text-align:center;;");
//! style.set("padding", "10px");
//! assert_eq!(style.to_css(), "padding:10px; text-align:center;");
//! ```

use std::fmt;

use smallvec::SmallVec;

/// Inline style as an ordered property map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: SmallVec<[(String, String); 6]>,
}

impl StyleMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an inline style string. Never fails; malformed declarations
    /// are dropped.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let mut map = Self::new();
        for declaration in css.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            map.set(name, value);
        }
        map
    }

    /// Set a property. Blank names or values are ignored; use
    /// [`remove`](Self::remove) to delete.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => value.clone_into(&mut slot.1),
            None => self.entries.push((name, value.to_owned())),
        }
    }

    /// Set a property when `value` is `Some`, remove it otherwise.
    pub fn set_or_remove(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => self.set(name, v),
            None => {
                self.remove(name);
            }
        }
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.trim().to_ascii_lowercase();
        let pos = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the property is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Copy every property of `other` into `self`, overriding on conflict.
    pub fn merge(&mut self, other: &StyleMap) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Properties in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Serialize as `name:value; name:value;`. Empty maps give `""`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(name);
            out.push(':');
            out.push_str(value);
            out.push(';');
        }
        out
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.set(name.as_ref(), value.as_ref());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tolerates_whitespace_and_stray_semicolons() {
        let style = StyleMap::parse("  display : inline-block;;vertical-align:top ;  ;");
        assert_eq!(style.get("display"), Some("inline-block"));
        assert_eq!(style.get("vertical-align"), Some("top"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn parse_skips_declarations_without_colon_or_value() {
        let style = StyleMap::parse("garbage; color:; :red; width:100%");
        assert_eq!(style.to_css(), "width:100%;");
    }

    #[test]
    fn values_keep_inner_colons() {
        let style = StyleMap::parse("background-image:url(http://x/y.png)");
        assert_eq!(style.get("background-image"), Some("url(http://x/y.png)"));
    }

    #[test]
    fn duplicate_keeps_first_position_last_value() {
        let style = StyleMap::parse("padding:1px; color:red; padding:2px");
        assert_eq!(style.to_css(), "padding:2px; color:red;");
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut style = StyleMap::parse("Text-Align:left");
        style.set("TEXT-ALIGN", "right");
        assert_eq!(style.to_css(), "text-align:right;");
    }

    #[test]
    fn set_keeps_unrelated_properties_in_place() {
        let mut style = StyleMap::parse("padding:20px; text-align:center; vertical-align:top;");
        style.set("padding", "8px");
        style.set("background-color", "#ff0000");
        assert_eq!(
            style.to_css(),
            "padding:8px; text-align:center; vertical-align:top; background-color:#ff0000;"
        );
    }

    #[test]
    fn set_or_remove_deletes_on_none() {
        let mut style = StyleMap::parse("background-color:#fff; padding:4px");
        style.set_or_remove("background-color", None);
        assert_eq!(style.to_css(), "padding:4px;");
        assert_eq!(style.remove("missing"), None);
    }

    #[test]
    fn merge_overrides_and_appends() {
        let mut base = StyleMap::parse("a:1; b:2");
        let other: StyleMap = [("b", "3"), ("c", "4")].into_iter().collect();
        base.merge(&other);
        assert_eq!(base.to_string(), "a:1; b:3; c:4;");
    }

    #[test]
    fn empty_map_serializes_empty() {
        assert_eq!(StyleMap::new().to_css(), "");
        assert!(StyleMap::parse(" ; ").is_empty());
    }
}
