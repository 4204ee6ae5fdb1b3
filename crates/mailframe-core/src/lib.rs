#![forbid(unsafe_code)]

//! Core: the host tree port, its in-memory adapter, and the shared
//! vocabulary of the email builder.
//!
//! # Role in mailframe
//! `mailframe-core` is the boundary between editor plugins and whatever
//! visual editor hosts them. Plugins talk to [`TreeHost`] and receive
//! [`HostEvent`]s; they never touch the widget's own object model.
//!
//! # Primary responsibilities
//! - **TreeHost**: kinds, tags, attributes, transient properties, children,
//!   selection.
//! - **Document**: arena-backed adapter that queues host notifications.
//! - **StyleMap**: ordered inline-style editing.
//! - **Debouncer**: trailing-edge coalescing of notification bursts.
//! - **html**: markup export of any subtree.
//!
//! # How it fits in the system
//! `mailframe-columns` implements the column layout plugin on top of this
//! crate, and `mailframe` re-exports both behind one facade.

pub mod attr;
pub mod debounce;
pub mod document;
pub mod event;
pub mod flags;
pub mod host;
pub mod html;
pub mod kind;
pub mod node;
pub mod style;

pub use debounce::Debouncer;
pub use document::Document;
pub use event::{HostEvent, HostEvents};
pub use flags::NodeFlags;
pub use host::TreeHost;
pub use html::{HtmlOptions, to_html};
pub use kind::ComponentKind;
pub use node::{NodeId, NodeSpec};
pub use style::StyleMap;
