//! # trellis
//!
//! **trellis** is a declarative section-tree URL router: nested sections
//! compile into a flat routing table, dispatchable views, and
//! selection-aware menus.
//!
//! ## Overview
//!
//! A site's URL space is declared once, at startup, as a tree of *sections*.
//! Each section owns a URL fragment, ordered children, and an inheritable
//! [`section::Options`] bag controlling visibility, URL capture groups,
//! target views, redirects, and dynamic enumeration. From that single tree
//! trellis derives everything else:
//!
//! - **[`section`]** - the tree itself, its declarative construction API, and
//!   recursive pattern emission
//! - **[`dispatch`]** - view target resolution (dotted locations or direct
//!   callables) with per-dispatcher memoization
//! - **[`site`]** - aggregation of many trees (and whole sub-sites) into one
//!   composed, optionally namespaced routing table
//! - **[`router`]** - the host-framework side: regex compilation, path
//!   matching, and target execution
//! - **[`menu`]** - global, hierarchical, and layered navigation structures
//!   honoring the current request's selection state
//! - **[`runtime_config`]** - environment-driven runtime knobs
//!
//! ## Architecture
//!
//! The flow is build-then-freeze:
//!
//! 1. At startup, section trees are declared and mounted into a [`site::Site`];
//!    `Site::patterns()` flattens the trees into `(regex, target, kwargs, name)`
//!    records and [`router::Router`] compiles them, failing fast on
//!    configuration errors.
//! 2. Per request, the router matches the path, extracts named captures, and
//!    executes the matched target - redirecting, calling a direct view, or
//!    resolving a dotted location through the [`dispatch::Dispatcher`]'s
//!    memoized registry.
//! 3. Independently, [`menu::Menu`] walks the same trees with the request's
//!    selected section and path to produce navigation structures. Selection
//!    is threaded through the traversal, never stored on the shared tree, so
//!    concurrent requests cannot interfere.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis::dispatch::{Dispatcher, Request, Response, ViewRegistry};
//! use trellis::router::Router;
//! use trellis::section::SectionTree;
//! use trellis::site::{MountOptions, Site};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Declare the tree.
//! let mut tree = SectionTree::new("");
//! let mut root = tree.root_mut();
//! let _products = root
//!     .add("products")?
//!     .with_name("products")
//!     .base(|o| o.module = Some("shop.views".to_string()));
//!
//! // Compose and compile.
//! let mut site = Site::new("shop");
//! site.add(tree, MountOptions::in_menu());
//! let router = Router::new(site.patterns())?;
//!
//! // Register views and serve.
//! let mut registry = ViewRegistry::new();
//! registry.register_fn("shop.views.Views", |_req, target, _captures, _context| {
//!     Response::json(200, serde_json::json!({ "target": target }))
//! });
//! let dispatcher = Dispatcher::new(registry);
//! let response = router.handle(&dispatcher, &Request::get("/products"))?;
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod menu;
pub mod router;
pub mod runtime_config;
pub mod section;
pub mod site;

pub use dispatch::{
    CaptureVec, ContextMap, Dispatcher, Location, Request, Response, ViewFn, ViewRegistry,
    ViewResolver, ViewSet,
};
pub use menu::{determine_selection, Menu, MenuChildren, MenuItem};
pub use router::{RouteMatch, Router};
pub use runtime_config::RuntimeConfig;
pub use section::{
    Condition, Kls, Options, Redirect, RoutePattern, RouteTarget, SectionError, SectionId,
    SectionMut, SectionTree, TargetName, Values,
};
pub use site::{MountOptions, SectionRegistry, Site};
