use tracing::debug;

use crate::section::{Options, SectionId, SectionTree};
use crate::site::Site;

/// One entry of a rendered menu.
///
/// This tuple is the sole contract handed to rendering layers; no other
/// section internals are exposed.
pub struct MenuItem<'t> {
    /// This entry's own URL fragment (an enumerated fragment for values
    /// branches)
    pub url: String,
    /// Accumulated URL segments from the menu root down to this entry
    pub full_url: Vec<String>,
    /// Display name
    pub alias: String,
    /// Whether this entry lies on the selected path
    pub selected: bool,
    /// Lazy handle to the entry's child layer
    pub children: MenuChildren<'t>,
    /// The section's options, for renderers that honor display flags
    pub options: &'t Options,
}

/// Lazy, restartable handle to a menu entry's child layer.
///
/// `items()` recomputes the layer on every call - the renderer controls
/// whether and how to descend, which keeps deep trees cheap and makes the
/// handle safe to re-expand.
pub struct MenuChildren<'t> {
    tree: &'t SectionTree,
    children: Vec<SectionId>,
    path: Vec<String>,
    full_url: Vec<String>,
    selected: bool,
}

impl<'t> MenuChildren<'t> {
    /// Expand the child layer. Non-routable (`show_base = false`) children
    /// are passed through: they contribute their URL segment and selection
    /// step but their own children appear in their place.
    #[must_use]
    pub fn items(&self) -> Vec<MenuItem<'t>> {
        let mut items = Vec::new();
        for &child in &self.children {
            items.extend(self.tree.expand_info(child, &self.path, &self.full_url, self.selected));
        }
        items
    }

    /// Number of candidate child sections before visibility filtering.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no candidate children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Consume the head of `path` against `url`.
///
/// Returns the node's selection state and the remaining path for its
/// children. An unselected parent or an exhausted path always yields
/// `(false, [])`; an empty URL rides the parent's selection without consuming
/// a segment.
#[must_use]
pub fn determine_selection(
    path: &[String],
    parent_selected: bool,
    url: &str,
) -> (bool, Vec<String>) {
    if !parent_selected || path.is_empty() {
        return (false, Vec::new());
    }
    if url.is_empty() {
        return (true, path.to_vec());
    }
    if path[0] == url {
        (true, path[1..].to_vec())
    } else {
        (false, Vec::new())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl SectionTree {
    /// Menu info for one section: zero entries when hidden, one per
    /// enumerated value when its options carry a `Values`, else exactly one.
    ///
    /// `parent_url` is copied, never mutated; each entry's children handle is
    /// lazy and recomputed per expansion.
    #[must_use]
    pub fn get_info<'t>(
        &'t self,
        id: SectionId,
        path: &[String],
        parent_url: &[String],
        parent_selected: bool,
    ) -> Vec<MenuItem<'t>> {
        let options = self.options(id);
        if !(options.active && options.exists && self.show(id)) {
            return Vec::new();
        }

        let node = self.node(id);
        let entry = |url: &str, alias: String| {
            let (selected, rest) = determine_selection(path, parent_selected, url);
            let mut full_url = parent_url.to_vec();
            if !url.is_empty() {
                full_url.push(url.to_string());
            }
            MenuItem {
                url: url.to_string(),
                full_url: full_url.clone(),
                alias,
                selected,
                children: MenuChildren {
                    tree: self,
                    children: node.children.clone(),
                    path: rest,
                    full_url,
                    selected,
                },
                options,
            }
        };

        match &options.values {
            Some(values) => values
                .get_info(path)
                .map(|(alias, url)| entry(&url, alias))
                .collect(),
            None => {
                let alias = options
                    .alias
                    .clone()
                    .unwrap_or_else(|| capitalize(&node.url));
                vec![entry(&node.url, alias)]
            }
        }
    }

    /// Like [`SectionTree::get_info`], but honoring `show_base`: a
    /// non-routable node is skipped, folding its URL segment and selection
    /// step into the descent to its children.
    #[must_use]
    pub(crate) fn expand_info<'t>(
        &'t self,
        id: SectionId,
        path: &[String],
        parent_url: &[String],
        parent_selected: bool,
    ) -> Vec<MenuItem<'t>> {
        if self.options(id).show_base {
            return self.get_info(id, path, parent_url, parent_selected);
        }

        let node = self.node(id);
        let (selected, rest) = determine_selection(path, parent_selected, &node.url);
        let mut full_url = parent_url.to_vec();
        if !node.url.is_empty() {
            full_url.push(node.url.clone());
        }

        let mut items = Vec::new();
        for &child in &node.children {
            items.extend(self.expand_info(child, &rest, &full_url, selected));
        }
        items
    }
}

/// Traversal engine producing menus for one request.
///
/// Holds the site, the identity of the selected top-level section (an index
/// into the site's menu entries), and the request path segments.
pub struct Menu<'s> {
    site: &'s Site,
    selected: Option<usize>,
    path: Vec<String>,
}

impl<'s> Menu<'s> {
    /// Create a menu walk for one request.
    #[must_use]
    pub fn new(site: &'s Site, selected: Option<usize>, path: Vec<String>) -> Self {
        Self {
            site,
            selected,
            path,
        }
    }

    fn selected_tree(&self) -> Option<&'s SectionTree> {
        let index = self.selected?;
        self.site.menu_trees().into_iter().nth(index)
    }

    /// One entry group per top-level menu section.
    ///
    /// A group's section is marked selected by node identity with the menu's
    /// selected section - passed into the walk as a parameter, never stored
    /// on the tree.
    #[must_use]
    pub fn global_items(&self) -> Vec<Vec<MenuItem<'s>>> {
        self.site
            .menu_trees()
            .into_iter()
            .enumerate()
            .map(|(index, tree)| {
                let is_selected = self.selected == Some(index);
                tree.get_info(tree.root(), &self.path, &[], is_selected)
            })
            .collect()
    }

    /// The selected section's subtree, one entry layer deep; descend through
    /// each item's children handle.
    #[must_use]
    pub fn hierarchical(&self) -> Vec<MenuItem<'s>> {
        match self.selected_tree() {
            Some(tree) => self.hierarchical_from(tree),
            None => Vec::new(),
        }
    }

    /// Hierarchical walk rooted at an explicit tree.
    #[must_use]
    pub fn hierarchical_from(&self, tree: &'s SectionTree) -> Vec<MenuItem<'s>> {
        tree.expand_info(tree.root(), &self.path, &[], true)
    }

    /// One sibling group per tree depth along the selected path.
    ///
    /// Within each layer, the first entry reporting selected seeds the next
    /// layer; traversal stops when a layer is empty or nothing in it is
    /// selected.
    #[must_use]
    pub fn layered(&self) -> Vec<Vec<MenuItem<'s>>> {
        let Some(tree) = self.selected_tree() else {
            return Vec::new();
        };

        let mut layers = Vec::new();
        let mut layer = tree.expand_info(tree.root(), &self.path, &[], true);
        while !layer.is_empty() {
            let next = layer
                .iter()
                .find(|item| item.selected)
                .map(|item| item.children.items());
            debug!(
                depth = layers.len(),
                entries = layer.len(),
                descending = next.is_some(),
                "Menu layer resolved"
            );
            layers.push(layer);
            match next {
                Some(items) => layer = items,
                None => break,
            }
        }
        layers
    }
}
