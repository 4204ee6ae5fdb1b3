#![forbid(unsafe_code)]

//! Node specs for the email-safe column structure.
//!
//! ```text
//! group (flexible-columns)
//! └── table.presentation          structural
//!     └── tr                      structural
//!         └── td (outer cell)     structural
//!             ├── <!--[if mso]> fallback table <![endif]-->
//!             ├── div.email-column[data-column-index=0]
//!             │   └── table > tr > td (content cell) → user content
//!             └── div.email-column[data-column-index=1] …
//! ```
//!
//! Columns are inline-block divs with a `max-width`, so they sit side by
//! side on wide clients and stack on narrow ones. The conditional fallback
//! gives Outlook's Word renderer a fixed-width table with the same widths.

use std::fmt::Write as _;

use mailframe_core::{ComponentKind, NodeFlags, NodeSpec, StyleMap};

use crate::config::{
    ATTR_ALIGN, ATTR_ALIGN_OVERRIDE, ATTR_BACKGROUND, ATTR_BACKGROUND_OVERRIDE, ATTR_INDEX,
    ATTR_PADDING, ATTR_PADDING_OVERRIDE, COLUMN, COLUMN_CELL, VerticalAlign,
};
use crate::policy::LayoutPolicy;

/// Everything needed to materialize one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    /// Position in the group.
    pub index: usize,
    /// `max-width` of the column, in pixels.
    pub width_px: u32,
    /// Padding inside the content cell.
    pub padding_px: u32,
    /// Background of the content cell.
    pub background: Option<String>,
    /// Effective alignment.
    pub vertical_align: VerticalAlign,
    /// Whether the alignment was set on the column itself.
    pub align_overridden: bool,
    /// Whether the padding was set on the column itself.
    pub padding_overridden: bool,
    /// Whether the background was set on the column itself.
    pub background_overridden: bool,
    /// Content-cell style carried over from before the rebuild.
    pub cell_style: StyleMap,
}

impl ColumnPlan {
    /// Style of the inline-block column wrapper.
    #[must_use]
    pub fn column_style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        style.set("display", "inline-block");
        style.set("vertical-align", self.vertical_align.as_str());
        style.set("width", "100%");
        style.set("max-width", &format!("{}px", self.width_px));
        style
    }

    /// Style of the content cell: the carried-over map with padding,
    /// alignment and background merged in.
    #[must_use]
    pub fn content_cell_style(&self) -> StyleMap {
        let mut style = self.cell_style.clone();
        merge_cell_values(
            &mut style,
            self.padding_px,
            self.vertical_align,
            self.background.as_deref(),
        );
        style
    }
}

/// Write padding, alignment and background into a content-cell style,
/// leaving every other property alone. No background removes the property.
pub fn merge_cell_values(
    style: &mut StyleMap,
    padding_px: u32,
    align: VerticalAlign,
    background: Option<&str>,
) {
    style.set("padding", &format!("{padding_px}px"));
    style.set("vertical-align", align.as_str());
    style.set_or_remove("background-color", background);
}

fn presentation_table() -> NodeSpec {
    NodeSpec::new(ComponentKind::TABLE, "table")
        .attr("role", "presentation")
        .attr("width", "100%")
        .attr("cellpadding", "0")
        .attr("cellspacing", "0")
        .attr("border", "0")
        .flags(NodeFlags::STRUCTURAL)
}

/// Outer presentation table.
#[must_use]
pub fn wrapper_table() -> NodeSpec {
    presentation_table()
}

/// Row of any structural table.
#[must_use]
pub fn structural_row() -> NodeSpec {
    NodeSpec::new(ComponentKind::ROW, "tr").flags(NodeFlags::STRUCTURAL)
}

/// Centered outer cell hosting the columns.
#[must_use]
pub fn outer_cell(policy: &LayoutPolicy) -> NodeSpec {
    let mut style = StyleMap::new();
    style.set("padding", &format!("0 {}px", policy.gutter_px));
    style.set("font-size", "0");
    NodeSpec::new(ComponentKind::CELL, "td")
        .attr("align", "center")
        .attr("style", style.to_css())
        .flags(NodeFlags::STRUCTURAL)
}

/// The column wrapper div.
#[must_use]
pub fn column(plan: &ColumnPlan) -> NodeSpec {
    let mut spec = NodeSpec::new(COLUMN, "div")
        .attr("class", "email-column")
        .attr(ATTR_INDEX, plan.index.to_string())
        .attr(ATTR_PADDING, plan.padding_px.to_string())
        .attr(ATTR_BACKGROUND, plan.background.clone().unwrap_or_default())
        .attr(ATTR_ALIGN, plan.vertical_align.as_str());
    if plan.align_overridden {
        spec = spec.attr(ATTR_ALIGN_OVERRIDE, plan.vertical_align.as_str());
    }
    if plan.padding_overridden {
        spec = spec.attr(ATTR_PADDING_OVERRIDE, plan.padding_px.to_string());
    }
    if plan.background_overridden {
        spec = spec.attr(
            ATTR_BACKGROUND_OVERRIDE,
            plan.background.clone().unwrap_or_default(),
        );
    }
    spec.attr("style", plan.column_style().to_css())
        .flags(NodeFlags::SELECTABLE | NodeFlags::HOVERABLE | NodeFlags::LAYERABLE)
}

/// Presentation table inside a column.
#[must_use]
pub fn column_table() -> NodeSpec {
    presentation_table()
}

/// The content cell: the only place users drop content into.
#[must_use]
pub fn content_cell(plan: &ColumnPlan) -> NodeSpec {
    NodeSpec::new(COLUMN_CELL, "td")
        .attr("style", plan.content_cell_style().to_css())
        .flags(NodeFlags::DROPPABLE | NodeFlags::HOVERABLE)
}

/// Conditional-comment table for renderers that ignore inline-block
/// layout. Inert: it carries no content and is regenerated on every
/// rebuild.
#[must_use]
pub fn fallback_block(policy: &LayoutPolicy, plans: &[ColumnPlan]) -> NodeSpec {
    NodeSpec::raw(fallback_markup(policy, plans))
}

/// Markup of the conditional fallback table.
#[must_use]
pub fn fallback_markup(policy: &LayoutPolicy, plans: &[ColumnPlan]) -> String {
    let mut out = String::from("<!--[if mso]>\n");
    let _ = writeln!(
        out,
        "<table role=\"presentation\" width=\"{}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">",
        policy.total_width_px
    );
    out.push_str("<tr>\n");
    for plan in plans {
        let mut style = StyleMap::new();
        style.set("padding", &format!("{}px", plan.padding_px));
        style.set_or_remove("background-color", plan.background.as_deref());
        let _ = writeln!(
            out,
            "<td width=\"{}\" valign=\"{}\">",
            plan.width_px, plan.vertical_align
        );
        out.push_str(
            "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\n",
        );
        let _ = writeln!(out, "<tr><td style=\"{}\"></td></tr>", style.to_css());
        out.push_str("</table>\n</td>\n");
    }
    out.push_str("</tr>\n</table>\n<![endif]-->");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(index: usize) -> ColumnPlan {
        ColumnPlan {
            index,
            width_px: 300,
            padding_px: 20,
            background: None,
            vertical_align: VerticalAlign::Top,
            align_overridden: false,
            padding_overridden: false,
            background_overridden: false,
            cell_style: StyleMap::new(),
        }
    }

    #[test]
    fn column_style_matches_hybrid_layout() {
        assert_eq!(
            plan(0).column_style().to_css(),
            "display:inline-block; vertical-align:top; width:100%; max-width:300px;"
        );
    }

    #[test]
    fn content_cell_style_keeps_carried_properties() {
        let mut p = plan(1);
        p.cell_style = StyleMap::parse("text-align:center; padding:4px; background-color:#000");
        p.background = Some("#ff0000".into());
        assert_eq!(
            p.content_cell_style().to_css(),
            "text-align:center; padding:20px; background-color:#ff0000; vertical-align:top;"
        );
        p.background = None;
        assert_eq!(
            p.content_cell_style().to_css(),
            "text-align:center; padding:20px; vertical-align:top;"
        );
    }

    #[test]
    fn column_spec_carries_index_and_override() {
        let mut p = plan(2);
        p.vertical_align = VerticalAlign::Bottom;
        p.align_overridden = true;
        let spec = column(&p);
        let attr = |name: &str| {
            spec.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(attr(ATTR_INDEX), Some("2"));
        assert_eq!(attr(ATTR_ALIGN_OVERRIDE), Some("bottom"));
        assert_eq!(attr(ATTR_BACKGROUND), Some(""));
        assert_eq!(attr(ATTR_PADDING_OVERRIDE), None);
        assert_eq!(attr(ATTR_BACKGROUND_OVERRIDE), None);
        assert!(spec.flags.is_selectable());
        assert!(!spec.flags.contains(NodeFlags::DRAGGABLE));
    }

    #[test]
    fn column_spec_records_padding_and_background_overrides() {
        let mut p = plan(0);
        p.padding_px = 8;
        p.padding_overridden = true;
        p.background_overridden = true;
        let spec = column(&p);
        let attr = |name: &str| {
            spec.attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(attr(ATTR_PADDING), Some("8"));
        assert_eq!(attr(ATTR_PADDING_OVERRIDE), Some("8"));
        assert_eq!(attr(ATTR_BACKGROUND_OVERRIDE), Some(""));
        assert_eq!(attr(ATTR_ALIGN_OVERRIDE), None);
    }

    #[test]
    fn structural_specs_are_inert() {
        let policy = LayoutPolicy::default();
        for spec in [wrapper_table(), structural_row(), outer_cell(&policy), column_table()] {
            assert_eq!(spec.flags, NodeFlags::STRUCTURAL);
        }
        assert!(!content_cell(&plan(0)).flags.is_selectable());
        assert!(content_cell(&plan(0)).flags.contains(NodeFlags::DROPPABLE));
    }

    #[test]
    fn fallback_mirrors_widths_and_padding() {
        let policy = LayoutPolicy::default();
        let mut second = plan(1);
        second.background = Some("#eee".into());
        second.vertical_align = VerticalAlign::Middle;
        let markup = fallback_markup(&policy, &[plan(0), second]);
        assert!(markup.starts_with("<!--[if mso]>"));
        assert!(markup.ends_with("<![endif]-->"));
        assert!(markup.contains("<table role=\"presentation\" width=\"600\""));
        assert_eq!(markup.matches("<td width=\"300\"").count(), 2);
        assert!(markup.contains("valign=\"middle\""));
        assert!(markup.contains("<tr><td style=\"padding:20px; background-color:#eee;\"></td></tr>"));
    }
}
