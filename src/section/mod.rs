//! # Section Module
//!
//! The section module is the core of trellis: a declarative tree of routing
//! nodes that compiles into a flat routing-pattern table.
//!
//! ## Overview
//!
//! A [`SectionTree`] is built once at startup from nested `add`/`first`/`base`
//! calls. Each node owns a URL fragment and an [`Options`] value cloned from
//! its parent at construction, so configuration inherits downwards but can
//! diverge per node. The tree then answers two questions:
//!
//! - **Routing**: [`SectionTree::pattern_list`] walks the tree and emits one
//!   [`RoutePattern`] per routable node (or one per enumerated [`Values`]
//!   branch), each an anchored regex plus a tagged view target.
//! - **Navigation**: the menu engine (see [`crate::menu`]) walks the same tree
//!   with the current request path to build selection-aware menus.
//!
//! ## Construction
//!
//! ```rust
//! use trellis::section::SectionTree;
//!
//! # fn main() -> Result<(), trellis::section::SectionError> {
//! let mut tree = SectionTree::new("");
//! let mut root = tree.root_mut().base(|o| o.show_base = false);
//! let mut products = root.add("products")?.with_name("products");
//! let _detail = products
//!     .add("42")?
//!     .with_capture("id")
//!     .with_name("detail");
//! assert_eq!(tree.pattern_list().len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Two-Phase Discipline
//!
//! Build, then freeze: all mutation happens through [`SectionMut`] cursors at
//! startup. Once serving begins the tree is only read - per-request state
//! (menu selection) is threaded through traversal parameters, never stored on
//! nodes - so one tree instance is safely shared across threads.

mod core;
mod options;
mod pattern;
mod values;

pub(crate) use pattern::prefix_pattern;

pub use core::{SectionError, SectionId, SectionIter, SectionMut, SectionTree};
pub use options::{Condition, Kls, Options, Redirect, TargetName};
pub use pattern::{RoutePattern, RouteTarget};
pub use values::Values;
