use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::dispatch::{CaptureVec, Dispatcher, Request, Response};
use crate::runtime_config::RuntimeConfig;
use crate::section::{RoutePattern, RouteTarget};

struct CompiledRoute {
    regex: Regex,
    route: RoutePattern,
}

/// Result of matching a request path against the routing table.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    /// The matched table entry
    pub route: &'r RoutePattern,
    /// Named capture groups extracted from the path
    pub captures: CaptureVec,
}

impl RouteMatch<'_> {
    /// Get a capture by name. Last write wins when the same name appears at
    /// several path depths.
    #[must_use]
    pub fn get_capture(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches request paths against a compiled routing table and executes the
/// matched target.
///
/// Patterns are root-relative: a request path's leading slash is stripped
/// before matching. Table order is match order; the first match wins.
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile a routing table with default runtime configuration.
    ///
    /// # Errors
    ///
    /// Fails fast on the first pattern that is not a valid regex.
    pub fn new(patterns: Vec<RoutePattern>) -> anyhow::Result<Self> {
        Self::with_config(patterns, RuntimeConfig::default())
    }

    /// Compile a routing table.
    ///
    /// With `strict_slash` set, the permissive `/?` suffix is rewritten away
    /// so only the exact form matches. With `dump_routes` set, the compiled
    /// table is printed after the build.
    ///
    /// # Errors
    ///
    /// Fails fast on the first pattern that is not a valid regex.
    pub fn with_config(patterns: Vec<RoutePattern>, config: RuntimeConfig) -> anyhow::Result<Self> {
        let mut routes = Vec::with_capacity(patterns.len());
        for route in patterns {
            let mut pattern = route.pattern.clone();
            if config.strict_slash {
                if let Some(body) = pattern.strip_suffix("/?$") {
                    pattern = format!("{body}$");
                }
            }
            let regex = Regex::new(&pattern).map_err(|err| {
                anyhow::anyhow!("invalid route pattern `{}`: {err}", route.pattern)
            })?;
            routes.push(CompiledRoute { regex, route });
        }

        info!(routes_count = routes.len(), "Routing table compiled");
        let router = Self { routes };
        if config.dump_routes {
            router.dump_routes();
        }
        Ok(router)
    }

    /// Print the compiled table to stdout, for debugging startup wiring.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for compiled in &self.routes {
            println!(
                "[route] {} -> {:?} (name={})",
                compiled.route.pattern,
                compiled.route.target,
                compiled.route.name.as_deref().unwrap_or("-")
            );
        }
    }

    /// Match a request path, extracting named captures.
    ///
    /// Returns `None` when nothing matches, which callers turn into the
    /// standard not-found response.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<RouteMatch<'_>> {
        let normalized = path.trim_start_matches('/');
        let match_start = Instant::now();

        for compiled in &self.routes {
            let Some(caps) = compiled.regex.captures(normalized) else {
                continue;
            };
            let mut captures = CaptureVec::new();
            for name in compiled.regex.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    captures.push((Arc::from(name), m.as_str().to_string()));
                }
            }
            debug!(
                path = %path,
                pattern = %compiled.route.pattern,
                captures = ?captures,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched"
            );
            return Some(RouteMatch {
                route: &compiled.route,
                captures,
            });
        }

        warn!(
            path = %path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }

    /// Match and execute a request.
    ///
    /// Unmatched paths and condition-hidden routes produce not-found
    /// responses - that is the designed mechanism for conditional route
    /// hiding, not a failure. View invocation results pass through unchanged.
    ///
    /// # Errors
    ///
    /// Propagates dispatch resolution failures and surfaces a matched
    /// dispatch route with no configured location as an error.
    pub fn handle(&self, dispatcher: &Dispatcher, req: &Request) -> anyhow::Result<Response> {
        let Some(matched) = self.route(&req.path) else {
            return Ok(Response::not_found());
        };

        match &matched.route.target {
            RouteTarget::Redirect { url } => Ok(Response::redirect(url)),
            RouteTarget::Direct(view) => {
                Ok((**view)(req, &matched.captures, &matched.route.kwargs))
            }
            RouteTarget::Dispatch {
                location,
                target,
                condition,
            } => {
                if condition.holds() {
                    debug!(path = %req.path, "Route hidden by condition");
                    return Ok(Response::not_found());
                }
                let Some(location) = location else {
                    return Err(anyhow::anyhow!(
                        "route `{}` resolves to no dispatch location",
                        matched.route.pattern
                    ));
                };
                dispatcher.call(req, location, target, &matched.captures, &matched.route.kwargs)
            }
        }
    }

    /// Number of compiled routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
