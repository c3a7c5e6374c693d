//! # Router Module
//!
//! Compiles the routing-pattern table emitted by a section tree (or composed
//! by a [`crate::site::Site`]) and serves requests against it.
//!
//! ## Overview
//!
//! The router is the host-framework side of the routing-table contract:
//!
//! 1. **Compilation**: at startup, every [`crate::section::RoutePattern`] is
//!    compiled into an anchored regex. A pattern that fails to compile is a
//!    configuration error surfaced immediately, never at request time.
//! 2. **Matching**: for each request, patterns are tested in table order;
//!    the first match wins and its named capture groups are extracted.
//! 3. **Execution**: a matched route is executed by kind - redirect routes
//!    return a 302, direct routes invoke their view, and dispatch routes
//!    check their dynamic condition (hidden routes 404 by design) before
//!    resolving through the [`crate::dispatch::Dispatcher`].
//!
//! Unmatched paths produce the standard not-found response; resolution
//! failures propagate as errors to the caller's top-level handling.

mod core;
#[cfg(test)]
mod tests;

pub use core::{RouteMatch, Router};
