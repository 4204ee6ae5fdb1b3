#![forbid(unsafe_code)]

//! Markup export: serialize a host subtree to HTML.
//!
//! Attribute values and text are escaped; raw nodes (conditional comments
//! for legacy renderers) are written verbatim. Output is compact and
//! deterministic: attributes appear in insertion order.

use crate::host::TreeHost;
use crate::node::NodeId;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Export switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Emit each element's component kind as `data-gjs-type`, so the markup
    /// can be loaded back into the editor with its component types intact.
    pub component_types: bool,
    /// Include the node passed to [`to_html`] itself, not only its children.
    pub include_root: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            component_types: false,
            include_root: true,
        }
    }
}

impl HtmlOptions {
    /// Toggle `data-gjs-type` emission.
    #[must_use]
    pub fn with_component_types(mut self, on: bool) -> Self {
        self.component_types = on;
        self
    }

    /// Toggle emission of the export root itself.
    #[must_use]
    pub fn with_root(mut self, on: bool) -> Self {
        self.include_root = on;
        self
    }
}

/// Serialize `node` (and its subtree) to HTML.
#[must_use]
pub fn to_html<H: TreeHost>(host: &H, node: NodeId, options: &HtmlOptions) -> String {
    let mut out = String::new();
    if options.include_root {
        write_node(host, node, options, &mut out);
    } else {
        for child in host.children(node) {
            write_node(host, child, options, &mut out);
        }
    }
    out
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn write_node<H: TreeHost>(host: &H, node: NodeId, options: &HtmlOptions, out: &mut String) {
    if !host.contains(node) {
        return;
    }
    if host.kind(node).is_some_and(|k| k.is_raw()) {
        out.push_str(host.text(node).unwrap_or_default());
        return;
    }
    let Some(tag) = host.tag(node) else {
        if let Some(text) = host.text(node) {
            out.push_str(&html_escape(text));
        }
        return;
    };

    out.push('<');
    out.push_str(tag);
    if options.component_types
        && let Some(kind) = host.kind(node)
        && host.attribute(node, "data-gjs-type").is_none()
    {
        push_attribute(out, "data-gjs-type", kind.as_str());
    }
    for (name, value) in host.attributes(node) {
        push_attribute(out, &name, &value);
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str()) {
        return;
    }
    if let Some(text) = host.text(node) {
        out.push_str(&html_escape(text));
    }
    for child in host.children(node) {
        write_node(host, child, options, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape(value));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKind, Document, NodeSpec};

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc
            .append_child(
                root,
                NodeSpec::new(ComponentKind::TABLE, "table").attr("role", "presentation"),
            )
            .unwrap();
        let cell = doc
            .append_child(table, NodeSpec::new(ComponentKind::CELL, "td"))
            .unwrap();
        doc.append_child(cell, NodeSpec::text("Fish & <chips>"));
        doc.append_child(
            cell,
            NodeSpec::new(ComponentKind::IMAGE, "img").attr("src", "a.png"),
        );
        doc.append_child(table, NodeSpec::raw("<!--[if mso]><td><![endif]-->"));
        (doc, table)
    }

    #[test]
    fn serializes_nested_elements_with_escaping() {
        let (doc, table) = sample();
        let html = to_html(&doc, table, &HtmlOptions::default());
        assert_eq!(
            html,
            "<table role=\"presentation\"><td>Fish &amp; &lt;chips&gt;<img src=\"a.png\"></td><!--[if mso]><td><![endif]--></table>"
        );
    }

    #[test]
    fn component_types_are_opt_in() {
        let (doc, table) = sample();
        let html = to_html(&doc, table, &HtmlOptions::default().with_component_types(true));
        assert!(html.starts_with("<table data-gjs-type=\"table\" role=\"presentation\">"));
        assert!(html.contains("<img data-gjs-type=\"image\" src=\"a.png\">"));
    }

    #[test]
    fn without_root_only_children_are_written() {
        let (doc, _) = sample();
        let html = to_html(&doc, doc.root(), &HtmlOptions::default().with_root(false));
        assert!(html.starts_with("<table"));
        assert!(!html.contains("<body"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc
            .append_child(root, NodeSpec::new(ComponentKind::DEFAULT, "div").attr("title", "a\"b"))
            .unwrap();
        let html = to_html(&doc, div, &HtmlOptions::default());
        assert_eq!(html, "<div title=\"a&quot;b\"></div>");
    }

    #[test]
    fn unknown_node_writes_nothing() {
        let doc = Document::new();
        assert_eq!(to_html(&doc, NodeId(42), &HtmlOptions::default()), "");
    }
}
