use super::*;
use crate::dispatch::{ContextMap, Dispatcher, Request, Response, ViewRegistry};
use crate::runtime_config::RuntimeConfig;
use crate::section::{Condition, RoutePattern, RouteTarget, SectionTree};
use serde_json::json;
use std::sync::Arc;

fn shop_patterns() -> Vec<RoutePattern> {
    let mut tree = SectionTree::new("");
    let mut root = tree.root_mut().base(|o| {
        o.show_base = false;
        o.module = Some("shop.views".to_string());
    });
    let mut products = root
        .add("products")
        .expect("add products")
        .with_name("products")
        .base(|o| o.target = crate::section::TargetName::Name("list".to_string()));
    let _detail = products
        .add(r"\d+")
        .expect("add detail")
        .with_capture("id")
        .with_name("detail")
        .base(|o| o.target = crate::section::TargetName::Name("detail".to_string()));
    tree.pattern_list()
}

fn shop_dispatcher() -> Dispatcher {
    let mut registry = ViewRegistry::new();
    registry.register_fn(
        "shop.views.Views",
        |_req, target, captures, _context| {
            let id = captures
                .iter()
                .find(|(k, _)| k.as_ref() == "id")
                .map(|(_, v)| v.clone());
            Response::json(200, json!({ "target": target, "id": id }))
        },
    );
    Dispatcher::new(registry)
}

#[test]
fn test_compile_rejects_invalid_pattern() {
    let patterns = vec![RoutePattern {
        pattern: "^(unclosed/?$".to_string(),
        target: RouteTarget::Redirect {
            url: "/".to_string(),
        },
        kwargs: ContextMap::new(),
        name: None,
    }];
    assert!(Router::new(patterns).is_err());
}

#[test]
fn test_route_matches_in_table_order_and_extracts_captures() {
    let router = Router::new(shop_patterns()).expect("compile");
    assert_eq!(router.len(), 2);

    let matched = router.route("/products/42").expect("match");
    assert_eq!(matched.get_capture("id"), Some("42"));
    assert_eq!(matched.route.name.as_deref(), Some("detail"));

    let listing = router.route("/products").expect("match");
    assert_eq!(listing.route.name.as_deref(), Some("products"));
    assert!(listing.captures.is_empty());
}

#[test]
fn test_route_tolerates_trailing_slash_by_default() {
    let router = Router::new(shop_patterns()).expect("compile");
    assert!(router.route("/products/").is_some());
}

#[test]
fn test_strict_slash_disables_tolerance() {
    let config = RuntimeConfig {
        strict_slash: true,
        ..RuntimeConfig::default()
    };
    let router = Router::with_config(shop_patterns(), config).expect("compile");
    assert!(router.route("/products").is_some());
    assert!(router.route("/products/").is_none());
}

#[test]
fn test_handle_unmatched_path_is_not_found() {
    let router = Router::new(shop_patterns()).expect("compile");
    let response = router
        .handle(&shop_dispatcher(), &Request::get("/nowhere"))
        .expect("handle");
    assert_eq!(response.status, 404);
}

#[test]
fn test_handle_dispatches_matched_route() {
    let router = Router::new(shop_patterns()).expect("compile");
    let response = router
        .handle(&shop_dispatcher(), &Request::get("/products/42"))
        .expect("handle");
    assert_eq!(response.status, 200);
    assert_eq!(response.body["target"], "detail");
    assert_eq!(response.body["id"], "42");
}

#[test]
fn test_handle_redirect_route() {
    let patterns = vec![RoutePattern {
        pattern: "^old/?$".to_string(),
        target: RouteTarget::Redirect {
            url: "/new".to_string(),
        },
        kwargs: ContextMap::new(),
        name: None,
    }];
    let router = Router::new(patterns).expect("compile");
    let response = router
        .handle(&shop_dispatcher(), &Request::get("/old"))
        .expect("handle");
    assert_eq!(response.status, 302);
    assert_eq!(response.get_header("location"), Some("/new"));
}

#[test]
fn test_handle_direct_route_bypasses_dispatcher() {
    let patterns = vec![RoutePattern {
        pattern: "^ping/?$".to_string(),
        target: RouteTarget::Direct(Arc::new(|_req, _captures, _context| {
            Response::json(200, json!({ "pong": true }))
        })),
        kwargs: ContextMap::new(),
        name: None,
    }];
    // The dispatcher has no registered views; a direct route never needs one.
    let router = Router::new(patterns).expect("compile");
    let response = router
        .handle(&Dispatcher::new(ViewRegistry::new()), &Request::get("/ping"))
        .expect("handle");
    assert_eq!(response.body["pong"], true);
}

#[test]
fn test_handle_condition_hidden_route_is_not_found() {
    let mut patterns = shop_patterns();
    for pattern in &mut patterns {
        if let RouteTarget::Dispatch { condition, .. } = &mut pattern.target {
            *condition = Condition::Always;
        }
    }
    let router = Router::new(patterns).expect("compile");
    let response = router
        .handle(&shop_dispatcher(), &Request::get("/products"))
        .expect("handle");
    assert_eq!(response.status, 404);
}

#[test]
fn test_handle_unresolvable_location_propagates_error() {
    let router = Router::new(shop_patterns()).expect("compile");
    let empty = Dispatcher::new(ViewRegistry::new());
    assert!(router.handle(&empty, &Request::get("/products")).is_err());
}
