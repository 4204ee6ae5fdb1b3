#![forbid(unsafe_code)]

//! Trait descriptors and the trait ↔ attribute bridge.
//!
//! Traits are the editable controls the side panel shows for the selected
//! node. Each trait is bound one-to-one to an attribute: the panel reads
//! normalized values with [`ColumnLayout::trait_values`] and writes through
//! [`ColumnLayout::set_trait`], whose attribute write is the notification
//! that drives reconcile or attribute sync.

use mailframe_core::attr::{parse_color, parse_px};
use mailframe_core::{NodeId, TreeHost};

use crate::config::{
    ATTR_ALIGN, ATTR_BACKGROUND, ATTR_COUNT, ATTR_PADDING, COLUMN, COLUMN_GROUP, ColumnConfig,
    GroupConfig, VerticalAlign,
};
use crate::policy::LayoutPolicy;
use crate::reconcile::ColumnLayout;

/// One option of a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraitOption {
    /// Attribute value written when chosen.
    pub value: String,
    /// Panel label.
    pub label: String,
}

impl TraitOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The control a trait is edited with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum TraitControl {
    /// Drop-down.
    Select {
        /// Choices, in panel order.
        options: Vec<TraitOption>,
    },
    /// Numeric input.
    Number {
        /// Smallest accepted value.
        min: u32,
        /// Increment.
        step: u32,
    },
    /// Color picker.
    Color,
}

/// An editable control bound to one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraitSpec {
    /// Attribute the trait reads and writes.
    pub name: &'static str,
    /// Panel label.
    pub label: &'static str,
    /// Control type.
    pub control: TraitControl,
}

/// Current normalized value of a trait.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraitValue {
    /// Attribute name.
    pub name: &'static str,
    /// Normalized value.
    pub value: String,
}

fn align_trait() -> TraitSpec {
    TraitSpec {
        name: ATTR_ALIGN,
        label: "Vertical Align",
        control: TraitControl::Select {
            options: VerticalAlign::ALL
                .iter()
                .map(|a| {
                    let label = match a {
                        VerticalAlign::Top => "Top",
                        VerticalAlign::Middle => "Middle",
                        VerticalAlign::Bottom => "Bottom",
                    };
                    TraitOption::new(a.as_str(), label)
                })
                .collect(),
        },
    }
}

fn padding_trait() -> TraitSpec {
    TraitSpec {
        name: ATTR_PADDING,
        label: "Padding (px)",
        control: TraitControl::Number { min: 0, step: 1 },
    }
}

fn background_trait() -> TraitSpec {
    TraitSpec {
        name: ATTR_BACKGROUND,
        label: "Background",
        control: TraitControl::Color,
    }
}

/// Traits of a column group: count, alignment, padding, background.
#[must_use]
pub fn group_traits(policy: &LayoutPolicy) -> Vec<TraitSpec> {
    let counts = (policy.min_columns.max(1)..=policy.max_columns)
        .map(|n| {
            let label = if n == 1 {
                "1 Column".to_owned()
            } else {
                format!("{n} Columns")
            };
            TraitOption::new(n.to_string(), label)
        })
        .collect();
    vec![
        TraitSpec {
            name: ATTR_COUNT,
            label: "Columns",
            control: TraitControl::Select { options: counts },
        },
        align_trait(),
        padding_trait(),
        background_trait(),
    ]
}

/// Traits of a single column: padding, background, alignment.
#[must_use]
pub fn column_traits() -> Vec<TraitSpec> {
    vec![padding_trait(), background_trait(), align_trait()]
}

impl ColumnLayout {
    /// Traits to show for `node`; empty for nodes this plugin doesn't own.
    #[must_use]
    pub fn traits_for<H: TreeHost>(&self, host: &H, node: NodeId) -> Vec<TraitSpec> {
        if host.is_kind(node, &COLUMN_GROUP) {
            group_traits(self.policy())
        } else if host.is_kind(node, &COLUMN) {
            column_traits()
        } else {
            Vec::new()
        }
    }

    /// Normalized current value of every trait of `node`, in panel order.
    #[must_use]
    pub fn trait_values<H: TreeHost>(&self, host: &H, node: NodeId) -> Vec<TraitValue> {
        let value = |name, value: String| TraitValue { name, value };
        if host.is_kind(node, &COLUMN_GROUP) {
            return self
                .config(host, node)
                .to_attributes()
                .into_iter()
                .map(|(name, v)| value(name, v))
                .collect();
        }
        if host.is_kind(node, &COLUMN) {
            let group = self.enclosing_config(host, node);
            let column = ColumnConfig::read(host, node, &group);
            return vec![
                value(ATTR_PADDING, column.padding_px.to_string()),
                value(ATTR_BACKGROUND, column.background.unwrap_or_default()),
                value(ATTR_ALIGN, column.vertical_align.as_str().to_owned()),
            ];
        }
        Vec::new()
    }

    /// Normalize `raw` for trait `name` and write it to `node`.
    ///
    /// Returns the written value, or `None` when `node` has no such trait.
    pub fn set_trait<H: TreeHost>(
        &self,
        host: &mut H,
        node: NodeId,
        name: &str,
        raw: &str,
    ) -> Option<String> {
        let is_group = host.is_kind(node, &COLUMN_GROUP);
        if !is_group && !host.is_kind(node, &COLUMN) {
            return None;
        }
        let value = match name {
            ATTR_COUNT if is_group => self.policy().coerce_column_count(raw).to_string(),
            ATTR_ALIGN => {
                let fallback = if is_group {
                    self.policy().default_align
                } else {
                    self.enclosing_config(host, node).vertical_align
                };
                VerticalAlign::parse(raw)
                    .unwrap_or(fallback)
                    .as_str()
                    .to_owned()
            }
            ATTR_PADDING => parse_px(raw).to_string(),
            ATTR_BACKGROUND => parse_color(raw).unwrap_or_default(),
            _ => return None,
        };
        host.set_attribute(node, name, &value);
        Some(value)
    }

    fn enclosing_config<H: TreeHost>(&self, host: &H, column: NodeId) -> GroupConfig {
        match host.closest(column, &COLUMN_GROUP) {
            Some(group) => self.config(host, group),
            None => GroupConfig::seed(self.policy()),
        }
    }
}
