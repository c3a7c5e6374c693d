use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::section::{prefix_pattern, RoutePattern, SectionMut, SectionTree};

/// How a section tree or sub-site is mounted into a [`Site`].
#[derive(Debug, Clone, Default)]
pub struct MountOptions {
    /// Re-prefix the mounted patterns under this static segment instead of
    /// leaving them as emitted
    pub include_as: Option<String>,
    /// Qualify mounted route names as `"{namespace}:{name}"`
    pub namespace: Option<String>,
    /// Mount at the site root: never re-prefixed
    pub base: bool,
    /// Include in menu traversals
    pub in_menu: bool,
}

impl MountOptions {
    /// Mount as emitted, outside the menu.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Mount as emitted and include in menus.
    #[must_use]
    pub fn in_menu() -> Self {
        Self {
            in_menu: true,
            ..Self::default()
        }
    }
}

enum TreeSource {
    Owned(SectionTree),
    Shared(Arc<SectionTree>),
}

impl TreeSource {
    fn tree(&self) -> &SectionTree {
        match self {
            TreeSource::Owned(tree) => tree,
            TreeSource::Shared(tree) => tree,
        }
    }
}

enum Mount {
    Section { source: TreeSource, opts: MountOptions },
    Site { site: Arc<Site>, opts: MountOptions },
}

/// Registry of shareable section trees and sites keyed by dotted location,
/// populated at startup. The site-level counterpart of the dispatcher's view
/// registry.
#[derive(Default)]
pub struct SectionRegistry {
    sections: HashMap<String, Arc<SectionTree>>,
    sites: HashMap<String, Arc<Site>>,
}

impl SectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section tree at a dotted location.
    pub fn register_section(&mut self, location: impl Into<String>, tree: Arc<SectionTree>) {
        self.sections.insert(location.into(), tree);
    }

    /// Register a site at a dotted location.
    pub fn register_site(&mut self, location: impl Into<String>, site: Arc<Site>) {
        self.sites.insert(location.into(), site);
    }

    /// Resolve a section tree.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing is registered at `location`; the error
    /// propagates to startup, like any other resolution failure.
    pub fn section(&self, location: &str) -> anyhow::Result<Arc<SectionTree>> {
        self.sections
            .get(location)
            .map(Arc::clone)
            .ok_or_else(|| anyhow::anyhow!("no section registered at location `{location}`"))
    }

    /// Resolve a site.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing is registered at `location`.
    pub fn site(&self, location: &str) -> anyhow::Result<Arc<Site>> {
        self.sites
            .get(location)
            .map(Arc::clone)
            .ok_or_else(|| anyhow::anyhow!("no site registered at location `{location}`"))
    }
}

/// An ordered collection of mounted section trees and merged sub-sites,
/// composing one routing-pattern table.
pub struct Site {
    name: String,
    mounts: Vec<Mount>,
    /// The lazily created base tree; its patterns compose after all mounts.
    base: Option<SectionTree>,
}

impl Site {
    /// Create an empty site.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mounts: Vec::new(),
            base: None,
        }
    }

    /// The site's name, also the default prefix for merged sub-sites.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mount an owned section tree.
    pub fn add(&mut self, tree: SectionTree, opts: MountOptions) {
        self.mounts.push(Mount::Section {
            source: TreeSource::Owned(tree),
            opts,
        });
    }

    /// Mount a shared section tree.
    pub fn add_shared(&mut self, tree: Arc<SectionTree>, opts: MountOptions) {
        self.mounts.push(Mount::Section {
            source: TreeSource::Shared(tree),
            opts,
        });
    }

    /// Mount the section tree registered at a dotted location.
    ///
    /// # Errors
    ///
    /// Propagates the registry's resolution error.
    pub fn add_registered(
        &mut self,
        location: &str,
        registry: &SectionRegistry,
        opts: MountOptions,
    ) -> anyhow::Result<()> {
        let tree = registry.section(location)?;
        self.add_shared(tree, opts);
        Ok(())
    }

    /// Merge a whole sub-site; its composed patterns mount under this site.
    pub fn merge(&mut self, site: Arc<Site>, opts: MountOptions) {
        self.mounts.push(Mount::Site { site, opts });
    }

    /// Merge the site registered at a dotted location.
    ///
    /// # Errors
    ///
    /// Propagates the registry's resolution error.
    pub fn merge_registered(
        &mut self,
        location: &str,
        registry: &SectionRegistry,
        opts: MountOptions,
    ) -> anyhow::Result<()> {
        let site = registry.site(location)?;
        self.merge(site, opts);
        Ok(())
    }

    /// The site's base section: an empty-URL tree named after the site,
    /// created on first call and mounted at the site root. Returns a building
    /// cursor to its root.
    pub fn make_base(&mut self) -> SectionMut<'_> {
        let name = self.name.clone();
        self.base
            .get_or_insert_with(|| SectionTree::named("", Some(name)))
            .root_mut()
    }

    /// Every mounted section tree, in mount order, including merged
    /// sub-sites' trees and the base tree.
    #[must_use]
    pub fn sections(&self) -> Vec<&SectionTree> {
        let mut trees = Vec::new();
        for mount in &self.mounts {
            match mount {
                Mount::Section { source, .. } => trees.push(source.tree()),
                Mount::Site { site, .. } => trees.extend(site.sections()),
            }
        }
        if let Some(base) = &self.base {
            trees.push(base);
        }
        trees
    }

    /// The section trees flagged for menu inclusion, in mount order. A merged
    /// sub-site contributes its own menu trees when its mount is flagged.
    #[must_use]
    pub fn menu_trees(&self) -> Vec<&SectionTree> {
        let mut trees = Vec::new();
        for mount in &self.mounts {
            match mount {
                Mount::Section { source, opts } if opts.in_menu => trees.push(source.tree()),
                Mount::Site { site, opts } if opts.in_menu => trees.extend(site.menu_trees()),
                _ => {}
            }
        }
        trees
    }

    /// The menu tree at `index`, as used by menu selection.
    #[must_use]
    pub fn menu_tree(&self, index: usize) -> Option<&SectionTree> {
        self.menu_trees().into_iter().nth(index)
    }

    /// Compose the full routing-pattern table: every mount's patterns in
    /// order, re-prefixed and namespace-qualified per its [`MountOptions`],
    /// with the base tree's patterns last.
    #[must_use]
    pub fn patterns(&self) -> Vec<RoutePattern> {
        let mut patterns = Vec::new();
        for mount in &self.mounts {
            match mount {
                Mount::Section { source, opts } => {
                    let prefix = (!opts.base).then_some(opts.include_as.as_deref()).flatten();
                    extend_composed(&mut patterns, source.tree().pattern_list(), prefix, opts);
                }
                Mount::Site { site, opts } => {
                    let prefix = if opts.base {
                        None
                    } else {
                        Some(opts.include_as.as_deref().unwrap_or(site.name()))
                    };
                    extend_composed(&mut patterns, site.patterns(), prefix, opts);
                }
            }
        }
        if let Some(base) = &self.base {
            patterns.extend(base.pattern_list());
        }
        info!(
            site = %self.name,
            patterns_count = patterns.len(),
            "Composed site routing table"
        );
        patterns
    }
}

fn extend_composed(
    patterns: &mut Vec<RoutePattern>,
    mounted: Vec<RoutePattern>,
    prefix: Option<&str>,
    opts: &MountOptions,
) {
    for mut pattern in mounted {
        if let Some(prefix) = prefix {
            pattern.pattern = prefix_pattern(&pattern.pattern, prefix);
        }
        if let Some(namespace) = &opts.namespace {
            pattern.name = pattern.name.map(|name| format!("{namespace}:{name}"));
        }
        patterns.push(pattern);
    }
}
