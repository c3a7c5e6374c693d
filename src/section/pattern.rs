//! The routing-table contract: plain-data route records handed from the
//! section tree to whatever compiles and serves them.

use crate::dispatch::{ContextMap, Location, ViewFn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::options::Condition;

static MULTI_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new("/+").expect("Failed to compile multi-slash regex"));

/// One entry of the flattened routing table.
///
/// `pattern` is an anchored regex over the root-relative request path,
/// `kwargs` is the route's pre-resolved extra context (splattable to the view
/// at call time), and `name` is the optional routing name, namespace-qualified
/// by [`crate::site::Site`] composition.
#[derive(Clone)]
pub struct RoutePattern {
    /// Anchored regex pattern string (e.g. `^products/(?P<id>\w+)/?$`)
    pub pattern: String,
    /// What serving the route means: redirect, direct view, or dispatch
    pub target: RouteTarget,
    /// Extra context merged into the view's kwargs
    pub kwargs: ContextMap,
    /// Routing name for reverse lookup
    pub name: Option<String>,
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("pattern", &self.pattern)
            .field("target", &self.target)
            .field("name", &self.name)
            .finish()
    }
}

/// The tagged view kinds a route can carry.
///
/// Exactly one variant governs each emitted pattern: a redirect overrides
/// target resolution, a raw callable bypasses the dispatcher, and everything
/// else dispatches by location + target name.
#[derive(Clone)]
pub enum RouteTarget {
    /// Redirect to a literal URL.
    Redirect {
        /// Redirect destination
        url: String,
    },
    /// Route straight to a plain view, bypassing dispatch resolution.
    Direct(ViewFn),
    /// Resolve `location` through the dispatcher and invoke `target` on it.
    Dispatch {
        /// Resolved target reference, if the options configure one
        location: Option<Location>,
        /// Target name to invoke on the resolved view bundle
        target: String,
        /// Dynamic hide switch checked at request time
        condition: Condition,
    },
}

impl fmt::Debug for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Redirect { url } => f.debug_struct("Redirect").field("url", url).finish(),
            RouteTarget::Direct(_) => f.write_str("Direct(..)"),
            RouteTarget::Dispatch {
                location, target, ..
            } => f
                .debug_struct("Dispatch")
                .field("location", location)
                .field("target", target)
                .finish(),
        }
    }
}

/// Collapse repeated slashes to one.
pub(crate) fn collapse_slashes(path: &str) -> String {
    MULTI_SLASH.replace_all(path, "/").into_owned()
}

/// Join path segments and anchor them as a full-path regex.
///
/// A path already ending in a slash is anchored exactly; otherwise a trailing
/// slash is tolerated.
pub(crate) fn anchor_segments(segments: &[String]) -> String {
    let joined = collapse_slashes(&segments.join("/"));
    if joined.ends_with('/') {
        format!("^{joined}$")
    } else {
        format!("^{joined}/?$")
    }
}

/// Re-anchor an already-anchored pattern under a static prefix.
pub(crate) fn prefix_pattern(pattern: &str, prefix: &str) -> String {
    let body = pattern.trim_start_matches('^');
    collapse_slashes(&format!("^{prefix}/{body}"))
}
