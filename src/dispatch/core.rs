use dashmap::DashMap;
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of URL captures before heap allocation.
/// Most section trees capture ≤4 segments per route.
pub const MAX_INLINE_CAPTURES: usize = 8;

/// Stack-allocated capture storage for the match hot path.
///
/// Capture names come from the static section tree (known at startup), so they
/// are shared `Arc<str>` keys; values are per-request data extracted from the
/// URL and stay owned.
pub type CaptureVec = SmallVec<[(Arc<str>, String); MAX_INLINE_CAPTURES]>;

/// Maximum inline response headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 8;

/// Stack-allocated header storage for responses.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Extra context merged into a route's dispatch kwargs, pre-resolved at
/// pattern-build time and handed to the view at call time.
pub type ContextMap = serde_json::Map<String, Value>;

/// An incoming request as seen by this crate.
///
/// The host framework owns the real request object; views built on trellis
/// only need the method and path, so this is a deliberately thin stand-in.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method (GET, POST, ...)
    pub method: Method,
    /// Request path (e.g. `/products/42`)
    pub path: String,
}

impl Request {
    /// Create a request with an explicit method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Create a GET request, the common case in tests and menus.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// The request path split into non-empty segments.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Response data returned from a view.
///
/// Contains the HTTP status code, headers, and JSON body handed back to the
/// host framework.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code (200, 302, 404, ...)
    pub status: u16,
    /// Response headers (stack-allocated for ≤8 headers)
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl Response {
    /// Create a response with the given status, headers, and body.
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with a content-type header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response with a JSON error body.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// The standard not-found response produced when no pattern matches or a
    /// route is hidden by its condition.
    #[must_use]
    pub fn not_found() -> Self {
        Self::error(404, "not found")
    }

    /// A 302 redirect to the given URL.
    #[must_use]
    pub fn redirect(url: &str) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("location"), url.to_string()));
        Self {
            status: 302,
            headers,
            body: Value::Null,
        }
    }

    /// Get a header by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A bundle of views invoked by target name.
///
/// This is the analog of a view class: the routing table stores *where* the
/// bundle lives plus a target name, and the bundle decides at call time what
/// that name means. Any closure with the right shape is a `ViewSet`.
pub trait ViewSet: Send + Sync {
    /// Invoke the named target with the request, URL captures, and the route's
    /// pre-resolved extra context.
    fn call(
        &self,
        req: &Request,
        target: &str,
        captures: &CaptureVec,
        context: &ContextMap,
    ) -> Response;
}

impl fmt::Debug for dyn ViewSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ViewSet(..)")
    }
}

impl<F> ViewSet for F
where
    F: Fn(&Request, &str, &CaptureVec, &ContextMap) -> Response + Send + Sync,
{
    fn call(
        &self,
        req: &Request,
        target: &str,
        captures: &CaptureVec,
        context: &ContextMap,
    ) -> Response {
        self(req, target, captures, context)
    }
}

/// A plain view that takes no target name. Routes whose target is a raw
/// callable bypass the dispatcher and invoke one of these directly.
pub type ViewFn = Arc<dyn Fn(&Request, &CaptureVec, &ContextMap) -> Response + Send + Sync>;

/// A resolved target reference emitted into the routing table.
///
/// Either a dotted location string resolved through the dispatcher's
/// [`ViewResolver`] at request time, or a direct callable that skips
/// resolution entirely.
#[derive(Clone)]
pub enum Location {
    /// Dotted location string, e.g. `"shop.views.Products"`.
    Path(String),
    /// A view bundle supplied directly at tree-construction time.
    Callable(Arc<dyn ViewSet>),
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Location::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// The crate's import mechanism: turns a dotted location string into a view
/// bundle. Implemented by [`ViewRegistry`] for the common registry-backed
/// case; tests substitute their own impls.
pub trait ViewResolver: Send + Sync {
    /// Resolve a dotted location string.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is known at `location`. The error
    /// propagates to the host framework's top-level handling; no fallback
    /// view is substituted.
    fn resolve(&self, location: &str) -> anyhow::Result<Arc<dyn ViewSet>>;
}

/// Registry of view bundles keyed by dotted location, populated at startup.
#[derive(Default)]
pub struct ViewRegistry {
    entries: HashMap<String, Arc<dyn ViewSet>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view bundle at a dotted location.
    ///
    /// Registering the same location twice replaces the earlier entry.
    pub fn register(&mut self, location: impl Into<String>, views: Arc<dyn ViewSet>) {
        let location = location.into();
        if self.entries.insert(location.clone(), views).is_some() {
            warn!(location = %location, "View registration replaced an existing entry");
        }
    }

    /// Register a closure as a view bundle.
    pub fn register_fn<F>(&mut self, location: impl Into<String>, f: F)
    where
        F: Fn(&Request, &str, &CaptureVec, &ContextMap) -> Response + Send + Sync + 'static,
    {
        self.register(location, Arc::new(f));
    }

    /// Number of registered locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ViewResolver for ViewRegistry {
    fn resolve(&self, location: &str) -> anyhow::Result<Arc<dyn ViewSet>> {
        self.entries
            .get(location)
            .map(Arc::clone)
            .ok_or_else(|| anyhow::anyhow!("no view registered at location `{location}`"))
    }
}

/// Resolves configured view targets and invokes them.
///
/// Resolution results are memoized per dispatcher instance, keyed by the
/// original location string, so repeated dispatch to the same location incurs
/// the resolver lookup once. The cache is lock-free and idempotent under
/// concurrent population.
pub struct Dispatcher {
    resolver: Arc<dyn ViewResolver>,
    views: DashMap<String, Arc<dyn ViewSet>>,
}

impl Dispatcher {
    /// Create a dispatcher backed by a [`ViewRegistry`].
    #[must_use]
    pub fn new(registry: ViewRegistry) -> Self {
        Self::with_resolver(Arc::new(registry))
    }

    /// Create a dispatcher with a custom resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn ViewResolver>) -> Self {
        Self {
            resolver,
            views: DashMap::new(),
        }
    }

    /// Resolve a location into an invokable view bundle.
    ///
    /// A `Location::Callable` is returned unchanged without touching the
    /// cache. A `Location::Path` is resolved through the resolver on first
    /// use and served from the cache afterwards; calling this twice with the
    /// same path yields the identical `Arc`.
    ///
    /// # Errors
    ///
    /// Propagates the resolver's error when a path cannot be resolved.
    pub fn get_view(&self, location: &Location) -> anyhow::Result<Arc<dyn ViewSet>> {
        match location {
            Location::Callable(views) => Ok(Arc::clone(views)),
            Location::Path(path) => {
                if let Some(cached) = self.views.get(path) {
                    debug!(location = %path, "View resolution cache hit");
                    return Ok(Arc::clone(cached.value()));
                }
                let resolved = self.resolver.resolve(path)?;
                debug!(location = %path, "View resolved and cached");
                self.views.insert(path.clone(), Arc::clone(&resolved));
                Ok(resolved)
            }
        }
    }

    /// Resolve the location and invoke the named target.
    ///
    /// Whatever the view returns is handed back unchanged; the dispatcher
    /// performs no error translation on the view's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error only when location resolution fails.
    pub fn call(
        &self,
        req: &Request,
        location: &Location,
        target: &str,
        captures: &CaptureVec,
        context: &ContextMap,
    ) -> anyhow::Result<Response> {
        let view = self.get_view(location)?;
        debug!(path = %req.path, target = %target, "Dispatching to view");
        Ok(view.call(req, target, captures, context))
    }

    /// Number of memoized resolutions, mainly useful in tests.
    #[must_use]
    pub fn cached_views(&self) -> usize {
        self.views.len()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cached_views", &self.views.len())
            .finish()
    }
}
