use super::*;
use crate::section::SectionTree;
use std::sync::Arc;

fn named_tree(url: &str, name: &str) -> SectionTree {
    let mut tree = SectionTree::new(url);
    let _ = tree.root_mut().with_name(name);
    tree
}

#[test]
fn test_patterns_compose_in_mount_order() {
    let mut site = Site::new("shop");
    site.add(named_tree("products", "products"), MountOptions::plain());
    site.add(named_tree("about", "about"), MountOptions::plain());

    let patterns: Vec<String> = site.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^products/?$", "^about/?$"]);
}

#[test]
fn test_include_as_reprefixes_mounted_patterns() {
    let mut site = Site::new("shop");
    site.add(
        named_tree("products", "products"),
        MountOptions {
            include_as: Some("catalogue".to_string()),
            ..MountOptions::default()
        },
    );

    let patterns: Vec<String> = site.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^catalogue/products/?$"]);
}

#[test]
fn test_namespace_qualifies_route_names() {
    let mut site = Site::new("shop");
    site.add(
        named_tree("products", "products"),
        MountOptions {
            namespace: Some("shop".to_string()),
            ..MountOptions::default()
        },
    );

    let names: Vec<Option<String>> = site.patterns().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec![Some("shop:products".to_string())]);
}

#[test]
fn test_merged_site_mounts_under_its_name() {
    let mut inner = Site::new("blog");
    inner.add(named_tree("posts", "posts"), MountOptions::plain());

    let mut outer = Site::new("main");
    outer.merge(Arc::new(inner), MountOptions::plain());

    let patterns: Vec<String> = outer.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^blog/posts/?$"]);
}

#[test]
fn test_base_mount_is_never_prefixed() {
    let mut inner = Site::new("blog");
    inner.add(named_tree("posts", "posts"), MountOptions::plain());

    let mut outer = Site::new("main");
    outer.merge(
        Arc::new(inner),
        MountOptions {
            base: true,
            ..MountOptions::default()
        },
    );

    let patterns: Vec<String> = outer.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^posts/?$"]);
}

#[test]
fn test_make_base_returns_the_same_tree() {
    let mut site = Site::new("shop");
    {
        let mut base = site.make_base();
        let _ = base.add("health").expect("add health");
    }
    {
        let mut base = site.make_base();
        let _ = base.add("version").expect("add version");
    }

    let patterns: Vec<String> = site.patterns().into_iter().map(|p| p.pattern).collect();
    assert!(patterns.contains(&"^health/?$".to_string()));
    assert!(patterns.contains(&"^version/?$".to_string()));
}

#[test]
fn test_base_patterns_compose_after_mounts() {
    let mut site = Site::new("shop");
    {
        let mut base = site.make_base();
        let _ = base.add("health").expect("add health");
    }
    site.add(named_tree("products", "products"), MountOptions::plain());

    let patterns: Vec<String> = site.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns.last().map(String::as_str), Some("^health/?$"));
}

#[test]
fn test_menu_trees_only_include_flagged_mounts() {
    let mut site = Site::new("shop");
    site.add(named_tree("products", "products"), MountOptions::in_menu());
    site.add(named_tree("legal", "legal"), MountOptions::plain());

    let urls: Vec<&str> = site
        .menu_trees()
        .into_iter()
        .map(|tree| tree.url(tree.root()))
        .collect();
    assert_eq!(urls, vec!["products"]);
    assert!(site.menu_tree(0).is_some());
    assert!(site.menu_tree(1).is_none());
}

#[test]
fn test_merged_menu_trees_flatten_into_parent() {
    let mut inner = Site::new("blog");
    inner.add(named_tree("posts", "posts"), MountOptions::in_menu());

    let mut outer = Site::new("main");
    outer.add(named_tree("home", "home"), MountOptions::in_menu());
    outer.merge(Arc::new(inner), MountOptions::in_menu());

    let urls: Vec<&str> = outer
        .menu_trees()
        .into_iter()
        .map(|tree| tree.url(tree.root()))
        .collect();
    assert_eq!(urls, vec!["home", "posts"]);
}

#[test]
fn test_registry_resolution_and_failure() {
    let mut registry = SectionRegistry::new();
    registry.register_section(
        "shop.sections.products",
        Arc::new(named_tree("products", "products")),
    );

    let mut site = Site::new("shop");
    site.add_registered("shop.sections.products", &registry, MountOptions::plain())
        .expect("registered section resolves");
    assert!(site
        .add_registered("shop.sections.missing", &registry, MountOptions::plain())
        .is_err());

    let patterns: Vec<String> = site.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^products/?$"]);
}

#[test]
fn test_registered_site_merge() {
    let mut inner = Site::new("blog");
    inner.add(named_tree("posts", "posts"), MountOptions::plain());

    let mut registry = SectionRegistry::new();
    registry.register_site("apps.blog.site", Arc::new(inner));

    let mut outer = Site::new("main");
    outer
        .merge_registered("apps.blog.site", &registry, MountOptions::plain())
        .expect("registered site resolves");
    assert!(outer
        .merge_registered("apps.missing.site", &registry, MountOptions::plain())
        .is_err());

    let patterns: Vec<String> = outer.patterns().into_iter().map(|p| p.pattern).collect();
    assert_eq!(patterns, vec!["^blog/posts/?$"]);
}

#[test]
fn test_sections_include_every_mounted_tree() {
    let mut inner = Site::new("blog");
    inner.add(named_tree("posts", "posts"), MountOptions::plain());

    let mut site = Site::new("main");
    site.add(named_tree("home", "home"), MountOptions::plain());
    site.merge(Arc::new(inner), MountOptions::plain());
    let _ = site.make_base();

    assert_eq!(site.sections().len(), 3);
}
