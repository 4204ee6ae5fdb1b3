#![forbid(unsafe_code)]

//! mailframe public facade.
//!
//! This crate re-exports the host tree port and the column layout plugin
//! behind one dependency, and provides a prelude for day-to-day usage.
//!
//! # Example
//!
//! ```
//! use mailframe::prelude::*;
//!
//! let mut doc = Document::new();
//! let layout = ColumnLayout::default();
//! let root = doc.root();
//! let group = doc.append_child(root, column_group_block(layout.policy())).unwrap();
//! assert!(layout.reconcile(&mut doc, group).is_rebuilt());
//!
//! let html = to_html(&doc, group, &HtmlOptions::default());
//! assert!(html.contains("<!--[if mso]>"));
//! ```

pub mod cli;
pub mod error;

pub use cli::{run, run_from_env};
pub use error::{CliError, Result};

// --- Core re-exports -------------------------------------------------------

pub use mailframe_core::{
    ComponentKind, Debouncer, Document, HostEvent, HostEvents, HtmlOptions, NodeFlags, NodeId,
    NodeSpec, StyleMap, TreeHost, to_html,
};

// --- Column re-exports -----------------------------------------------------

pub use mailframe_columns::{
    ApplyOutcome, ColumnEditor, ColumnLayout, GroupConfig, LayoutPolicy, PolicyError,
    ReconcileOutcome, TraitSpec, VerticalAlign, column_group_block, route_selection,
};

pub mod prelude {
    pub use crate::{
        ColumnEditor, ColumnLayout, Document, HtmlOptions, LayoutPolicy, NodeId, NodeSpec,
        ReconcileOutcome, TreeHost, column_group_block, to_html,
    };

    pub use crate::{columns, core};
}

pub use mailframe_columns as columns;
pub use mailframe_core as core;
