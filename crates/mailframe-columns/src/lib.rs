#![forbid(unsafe_code)]

//! Mailframe Columns
//!
//! The "Columns (1-4)" block: a multi-column email section whose nested
//! table/column markup is rebuilt from a handful of declarative attributes.
//!
//! # Key Components
//!
//! - [`ColumnLayout`] - Reconcile, per-column attribute sync, trait values
//! - [`ColumnEditor`] - Notification handling, debouncing, selection routing
//! - [`LayoutPolicy`] - Width budget, count range, defaults, debounce windows
//! - [`GroupConfig`] / [`ColumnConfig`] - Normalized attribute readings
//! - [`TraitSpec`] - Panel controls bound to attributes
//!
//! # Role in mailframe
//! Email clients render little beyond tables and inline styles, and Outlook
//! on Windows renders even less. The group's markup is therefore a hybrid:
//! inline-block columns inside a presentation table, plus a conditional
//! fixed-width table for Word-based renderers. Users only ever edit the
//! group's attributes and the content inside each column; everything else
//! is regenerated.
//!
//! # How it fits in the system
//! Everything here talks to the editor through
//! [`mailframe_core::TreeHost`], so the same code drives the real widget and
//! the in-memory [`mailframe_core::Document`] used by the CLI and tests.

pub mod block;
pub mod column_attrs;
pub mod config;
pub mod controller;
pub mod markup;
pub mod policy;
pub mod reconcile;
pub mod selection;
pub mod traits;

pub use block::{BLOCK_CATEGORY, BLOCK_LABEL, column_group_block};
pub use column_attrs::{ApplyOutcome, ApplySkip, PROP_APPLYING};
pub use config::{
    ATTR_ALIGN, ATTR_ALIGN_OVERRIDE, ATTR_BACKGROUND, ATTR_BACKGROUND_OVERRIDE, ATTR_COUNT,
    ATTR_INDEX, ATTR_PADDING, ATTR_PADDING_OVERRIDE, COLUMN, COLUMN_CELL, COLUMN_GROUP,
    ColumnConfig, Fingerprint, GroupConfig, VerticalAlign, column_index,
};
pub use controller::{ColumnEditor, Completed, PendingWork};
pub use policy::{LayoutPolicy, PolicyError};
pub use reconcile::{ColumnLayout, PROP_FINGERPRINT, PROP_REBUILDING, ReconcileOutcome, SkipReason};
pub use selection::route_selection;
pub use traits::{TraitControl, TraitOption, TraitSpec, TraitValue, column_traits, group_traits};
