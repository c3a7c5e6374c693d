//! # Site Module
//!
//! Top-level aggregation: a [`Site`] mounts section trees (and whole
//! sub-sites) into one composed routing-pattern table with optional
//! namespacing, and decides which sections appear in menus.
//!
//! ## Mounting
//!
//! Trees are mounted owned, shared (`Arc`), or by dotted location through a
//! [`SectionRegistry`] - the same registry mechanism the dispatcher uses for
//! view locations. Mount behavior is controlled by [`MountOptions`]:
//! re-prefixing (`include_as`), route-name namespacing (`namespace`),
//! site-root mounting (`base`), and menu inclusion (`in_menu`).

mod core;
#[cfg(test)]
mod tests;

pub use core::{MountOptions, SectionRegistry, Site};
