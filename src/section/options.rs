//! Per-section routing and display configuration.
//!
//! An [`Options`] value is attached to every section node. Children inherit a
//! clone of their parent's options at `add` time, so configuration flows down
//! the tree but can diverge independently afterwards.

use crate::dispatch::{Location, ViewFn, ViewSet};
use std::fmt;
use std::sync::Arc;

use super::pattern::{anchor_segments, RoutePattern, RouteTarget};
use super::values::Values;

/// Dynamic hide switch: when it holds, the section is not shown.
///
/// Either a fixed flag or a callable evaluated fresh on every check, so a
/// section can appear and disappear between requests.
#[derive(Clone, Default)]
pub enum Condition {
    /// The default: nothing stands in the way.
    #[default]
    Never,
    /// Always hides the section.
    Always,
    /// Evaluated on every visibility check.
    Dynamic(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Condition {
    /// Whether the condition currently stands in the way of showing.
    #[must_use]
    pub fn holds(&self) -> bool {
        match self {
            Condition::Never => false,
            Condition::Always => true,
            Condition::Dynamic(f) => (**f)(),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Never => f.write_str("Never"),
            Condition::Always => f.write_str("Always"),
            Condition::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Redirect override: when it resolves to a non-empty URL, the section emits a
/// redirect route instead of resolving its view target.
#[derive(Clone)]
pub enum Redirect {
    /// Redirect to a literal URL.
    To(String),
    /// Computed per pattern build; `None` or empty falls through to the
    /// section's target resolution.
    Dynamic(Arc<dyn Fn() -> Option<String> + Send + Sync>),
}

impl Redirect {
    fn resolve(&self) -> Option<String> {
        let url = match self {
            Redirect::To(url) => Some(url.clone()),
            Redirect::Dynamic(f) => (**f)(),
        };
        url.filter(|u| !u.is_empty())
    }
}

impl fmt::Debug for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::To(url) => f.debug_tuple("To").field(url).finish(),
            Redirect::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Where the section's view bundle lives.
#[derive(Clone)]
pub enum Kls {
    /// No view bundle of its own; `module` alone decides the location.
    None,
    /// Dotted path, joined onto `module` when one is set. Leading and
    /// trailing separator characters are stripped before resolution.
    Path(String),
    /// A view bundle supplied directly.
    Callable(Arc<dyn ViewSet>),
}

impl fmt::Debug for Kls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kls::None => f.write_str("None"),
            Kls::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Kls::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// The target invoked on the resolved view bundle.
#[derive(Clone)]
pub enum TargetName {
    /// Name looked up on the bundle at dispatch time.
    Name(String),
    /// A raw view; the route bypasses dispatch resolution entirely.
    Callable(ViewFn),
}

impl fmt::Debug for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetName::Name(n) => f.debug_tuple("Name").field(n).finish(),
            TargetName::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Inheritable routing/display configuration for one section.
#[derive(Clone, Debug)]
pub struct Options {
    /// Considered at all (overrides `exists` and `display`)
    pub active: bool,
    /// Routable when visited; `false` yields not-found
    pub exists: bool,
    /// Shown as a physical link in menus
    pub display: bool,
    /// This node itself is routable, vs. pass-through to its children
    pub show_base: bool,
    /// Menu display name; derived from the URL fragment when absent
    pub alias: Option<String>,
    /// Named capture group for this node's URL segment; static segment when absent
    pub capture: Option<String>,
    /// Enumerator expanding this section into one branch per value
    pub values: Option<Values>,
    /// Where the view bundle lives
    pub kls: Kls,
    /// Module prefix for a dotted `kls` path
    pub module: Option<String>,
    /// Target invoked on the resolved bundle
    pub target: TargetName,
    /// Redirect override; set and resolving non-empty beats target resolution
    pub redirect: Option<Redirect>,
    /// Dynamic hide switch
    pub condition: Condition,
    /// Extra context merged into the route's dispatch kwargs
    pub extra_context: crate::dispatch::ContextMap,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            active: true,
            exists: true,
            display: true,
            show_base: true,
            alias: None,
            capture: None,
            values: None,
            kls: Kls::Path("Views".to_string()),
            module: None,
            target: TargetName::Name("base".to_string()),
            redirect: None,
            condition: Condition::Never,
            extra_context: crate::dispatch::ContextMap::new(),
        }
    }
}

impl Options {
    /// Snapshot the current configuration, apply the patch, and return the
    /// result as an independent copy. Mutating the clone never affects the
    /// source.
    #[must_use]
    pub fn clone_with(&self, patch: impl FnOnce(&mut Options)) -> Options {
        let mut cloned = self.clone();
        patch(&mut cloned);
        cloned
    }

    /// In-place field assignment, used by `Section::base`.
    pub fn update(&mut self, patch: impl FnOnce(&mut Options)) {
        patch(self);
    }

    /// The single dynamic visibility hook: false when the condition stands in
    /// the way.
    #[must_use]
    pub fn show(&self) -> bool {
        !self.condition.holds()
    }

    /// Fold `kls` and `module` into a dispatchable location.
    ///
    /// Returns `None` when neither names anything - such a section emits a
    /// dispatch route with no location, which surfaces as a server error if
    /// ever matched.
    #[must_use]
    pub fn resolve_target(&self) -> Option<Location> {
        match &self.kls {
            Kls::Callable(views) => Some(Location::Callable(Arc::clone(views))),
            Kls::None => self.module.clone().map(Location::Path),
            Kls::Path(raw) => {
                let kls = raw.trim_matches('.');
                match (self.module.as_deref(), kls.is_empty()) {
                    (None, true) => None,
                    (None, false) => Some(Location::Path(kls.to_string())),
                    (Some(module), true) => Some(Location::Path(module.to_string())),
                    (Some(module), false) => Some(Location::Path(format!("{module}.{kls}"))),
                }
            }
        }
    }

    /// Produce this section's routing-table entry from its full segment list,
    /// or nothing when the section is inactive or does not exist.
    ///
    /// Building rule: join the segments with `/`, collapse repeated slashes,
    /// anchor exactly when the path ends in a slash and permissively
    /// otherwise. A resolving redirect wins over target resolution; a raw
    /// callable target bypasses dispatch.
    #[must_use]
    pub fn url_pattern(&self, segments: &[String], name: Option<&str>) -> Option<RoutePattern> {
        if !(self.active && self.exists) {
            return None;
        }

        let pattern = anchor_segments(segments);
        let name = name.map(str::to_string);

        if let Some(url) = self.redirect.as_ref().and_then(Redirect::resolve) {
            return Some(RoutePattern {
                pattern,
                target: RouteTarget::Redirect { url },
                kwargs: crate::dispatch::ContextMap::new(),
                name,
            });
        }

        match &self.target {
            TargetName::Callable(view) => Some(RoutePattern {
                pattern,
                target: RouteTarget::Direct(Arc::clone(view)),
                kwargs: self.extra_context.clone(),
                name,
            }),
            TargetName::Name(target) => Some(RoutePattern {
                pattern,
                target: RouteTarget::Dispatch {
                    location: self.resolve_target(),
                    target: target.clone(),
                    condition: self.condition.clone(),
                },
                kwargs: self.extra_context.clone(),
                name,
            }),
        }
    }
}
