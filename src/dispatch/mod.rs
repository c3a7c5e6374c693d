//! # Dispatch Module
//!
//! View resolution and invocation for trellis routes.
//!
//! ## Overview
//!
//! A section's options describe *where* a view lives (a dotted location string
//! or a direct callable) and *which* target on it to invoke. The dispatcher
//! turns that description into a call:
//!
//! - **[`Location`]** - a resolved target reference emitted into the routing table
//! - **[`ViewSet`]** - a bundle of views invoked by target name (the analog of a
//!   view class with methods)
//! - **[`ViewResolver`]** / **[`ViewRegistry`]** - the crate's import mechanism:
//!   dotted location strings are looked up in a registry populated at startup
//! - **[`Dispatcher`]** - resolves locations through the resolver, memoizing each
//!   resolved view so repeated dispatch to the same location pays the lookup once
//!
//! ## Resolution Rules
//!
//! 1. A `Location::Callable` is returned unchanged - it never touches the cache.
//! 2. A `Location::Path` is resolved through the [`ViewResolver`] and cached by
//!    the original string key.
//! 3. Resolution failures propagate to the caller; no fallback view is
//!    substituted.
//!
//! ## Concurrency
//!
//! The memoization table is a [`dashmap::DashMap`], so a `Dispatcher` shared
//! across request-handling threads needs no external locking. Two threads
//! racing to resolve the same location both succeed; the second insert is
//! redundant but harmless.

mod core;

pub use core::{
    CaptureVec, ContextMap, Dispatcher, HeaderVec, Location, Request, Response, ViewFn,
    ViewRegistry, ViewResolver, ViewSet, MAX_INLINE_CAPTURES, MAX_INLINE_HEADERS,
};
