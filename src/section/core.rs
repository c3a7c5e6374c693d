//! Section tree core - declarative construction and pattern emission.
//!
//! The tree is built once at startup through [`SectionMut`] cursors and is
//! read-mostly afterwards: pattern emission and menu walks never mutate nodes,
//! so a frozen tree is safe to share across request-handling threads.

use once_cell::sync::{Lazy, OnceCell};
use std::fmt;
use tracing::debug;

use super::options::Options;
use super::pattern::RoutePattern;

static DEFAULT_OPTIONS: Lazy<Options> = Lazy::new(Options::default);

/// Configuration errors surfaced at tree-construction time, never deferred to
/// request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// `add("")` was called; a child at the parent's own URL must go through
    /// `first()` so the slot-0 replacement rule applies.
    EmptyChildUrl,
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionError::EmptyChildUrl => write!(
                f,
                "section configuration error: use first() to add a section with the same URL as its parent"
            ),
        }
    }
}

impl std::error::Error for SectionError {}

/// Index handle identifying one node of a [`SectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(u32);

impl SectionId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct SectionNode {
    pub(crate) url: String,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: Vec<SectionId>,
    /// Materialized on first mutation; reads fall back to a shared default.
    pub(crate) options: Option<Options>,
    /// Root-to-node segment list, computed once on first access.
    pub(crate) pattern: OnceCell<Vec<String>>,
}

impl SectionNode {
    fn new(url: String, name: Option<String>, parent: Option<SectionId>) -> Self {
        Self {
            url,
            name,
            parent,
            children: Vec::new(),
            options: None,
            pattern: OnceCell::new(),
        }
    }
}

/// A tree of routing/menu sections stored in an arena.
///
/// Nodes refer to each other by [`SectionId`]; the tree owns every node and
/// no node owns another, so parent back-references cost nothing and cannot
/// form reference cycles.
#[derive(Debug)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
    root: SectionId,
}

impl SectionTree {
    /// Create a tree whose root carries the given URL fragment.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::named(url, None)
    }

    /// Create a tree with a named root.
    #[must_use]
    pub fn named(url: impl Into<String>, name: Option<String>) -> Self {
        let root = SectionId(0);
        Self {
            nodes: vec![SectionNode::new(url.into(), name, None)],
            root,
        }
    }

    /// The root section's id.
    #[must_use]
    pub fn root(&self) -> SectionId {
        self.root
    }

    /// A building cursor positioned at the root.
    pub fn root_mut(&mut self) -> SectionMut<'_> {
        SectionMut {
            id: self.root,
            tree: self,
        }
    }

    /// A building cursor positioned at `id`.
    pub fn cursor(&mut self, id: SectionId) -> SectionMut<'_> {
        SectionMut { id, tree: self }
    }

    pub(crate) fn node(&self, id: SectionId) -> &SectionNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: SectionId) -> &mut SectionNode {
        &mut self.nodes[id.index()]
    }

    /// The node's URL fragment.
    #[must_use]
    pub fn url(&self, id: SectionId) -> &str {
        &self.node(id).url
    }

    /// The node's routing name.
    #[must_use]
    pub fn name(&self, id: SectionId) -> Option<&str> {
        self.node(id).name.as_deref()
    }

    /// The node's parent, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.node(id).parent
    }

    /// The node's children, in order.
    #[must_use]
    pub fn children(&self, id: SectionId) -> &[SectionId] {
        &self.node(id).children
    }

    /// The node's options; a node never customized reads as the default.
    #[must_use]
    pub fn options(&self, id: SectionId) -> &Options {
        self.node(id).options.as_ref().unwrap_or(&DEFAULT_OPTIONS)
    }

    /// The node's options for mutation, materializing the default on first
    /// use. Build-phase only.
    pub fn options_mut(&mut self, id: SectionId) -> &mut Options {
        self.node_mut(id).options.get_or_insert_with(Options::default)
    }

    /// Append a child section under `parent`, inheriting a clone of the
    /// parent's options. The child starts without a capture group of its own.
    ///
    /// # Errors
    ///
    /// [`SectionError::EmptyChildUrl`] when `url` is empty.
    pub fn add(&mut self, parent: SectionId, url: &str) -> Result<SectionId, SectionError> {
        if url.is_empty() {
            return Err(SectionError::EmptyChildUrl);
        }
        Ok(self.attach(parent, url, |children, id| children.push(id)))
    }

    /// Insert a child with the same URL as `parent` at slot 0, replacing any
    /// previously inserted such child.
    pub fn first(&mut self, parent: SectionId) -> SectionId {
        let replaceable = self
            .node(parent)
            .children
            .first()
            .copied()
            .is_some_and(|slot0| self.node(slot0).url.is_empty());
        if replaceable {
            // Replaced node stays in the arena but is unreachable.
            self.node_mut(parent).children.remove(0);
        }
        self.attach(parent, "", |children, id| children.insert(0, id))
    }

    fn attach(
        &mut self,
        parent: SectionId,
        url: &str,
        place: impl FnOnce(&mut Vec<SectionId>, SectionId),
    ) -> SectionId {
        let options = self.options(parent).clone_with(|o| o.capture = None);
        let id = SectionId(self.nodes.len() as u32);
        let mut node = SectionNode::new(url.to_string(), None, Some(parent));
        node.options = Some(options);
        self.nodes.push(node);
        place(&mut self.node_mut(parent).children, id);
        id
    }

    /// Walk parent links to the node with no parent.
    #[must_use]
    pub fn root_ancestor(&self, id: SectionId) -> SectionId {
        match self.node(id).parent {
            Some(parent) => self.root_ancestor(parent),
            None => id,
        }
    }

    /// Whether this node and every ancestor pass their dynamic visibility
    /// check. Short-circuits on the first hidden ancestor.
    #[must_use]
    pub fn show(&self, id: SectionId) -> bool {
        let parent_shows = match self.node(id).parent {
            Some(parent) => self.show(parent),
            None => true,
        };
        parent_shows && self.options(id).show()
    }

    /// Whether the node is shown and flagged for display as a physical link.
    #[must_use]
    pub fn appear(&self, id: SectionId) -> bool {
        self.options(id).display && self.show(id)
    }

    /// The node's full root-to-self segment list, each segment wrapped as a
    /// named capture group when its options declare one. Structural, so the
    /// result is cached per node after the first computation.
    #[must_use]
    pub fn pattern_segments(&self, id: SectionId) -> &[String] {
        self.node(id).pattern.get_or_init(|| {
            let mut segments = match self.node(id).parent {
                Some(parent) => self.pattern_segments(parent).to_vec(),
                None => Vec::new(),
            };
            if let Some(segment) = self.own_segment(id) {
                segments.push(segment);
            }
            segments
        })
    }

    /// The segment this node contributes to its descendants' patterns.
    /// Empty-URL nodes without a capture contribute nothing.
    fn own_segment(&self, id: SectionId) -> Option<String> {
        let node = self.node(id);
        match self.options(id).capture.as_deref() {
            Some(capture) => Some(format!("(?P<{capture}>{})", node.url)),
            None if node.url.is_empty() => None,
            None => Some(node.url.clone()),
        }
    }

    /// Flatten the whole tree into routing-table entries, in tree order.
    ///
    /// Recomputed on each call; calling it twice on an unmutated tree yields
    /// structurally identical tables.
    #[must_use]
    pub fn pattern_list(&self) -> Vec<RoutePattern> {
        self.pattern_list_from(self.root)
    }

    /// Flatten the subtree rooted at `id`.
    ///
    /// A node is directly routable when its options say `show_base` or it has
    /// no children; either way its children are always visited, in order.
    #[must_use]
    pub fn pattern_list_from(&self, id: SectionId) -> Vec<RoutePattern> {
        let node = self.node(id);
        let mut patterns = Vec::new();
        if self.options(id).show_base || node.children.is_empty() {
            patterns.extend(self.url_patterns(id));
        }
        for &child in &node.children {
            patterns.extend(self.pattern_list_from(child));
        }
        patterns
    }

    /// This node's own routing-table entries: one per enumerated value when
    /// its options carry a `Values`, else at most one.
    #[must_use]
    pub fn url_patterns(&self, id: SectionId) -> Vec<RoutePattern> {
        let options = self.options(id);
        let name = self.node(id).name.as_deref();
        let segments = self.pattern_segments(id);

        let patterns: Vec<RoutePattern> = match &options.values {
            Some(values) => values
                .get_info(&[])
                .filter_map(|(_alias, url)| {
                    let mut expanded = segments.to_vec();
                    let segment = match options.capture.as_deref() {
                        Some(capture) => format!("(?P<{capture}>{url})"),
                        None => url,
                    };
                    match expanded.last_mut() {
                        Some(last) => *last = segment,
                        None => expanded.push(segment),
                    }
                    options.url_pattern(&expanded, name)
                })
                .collect(),
            None => options.url_pattern(segments, name).into_iter().collect(),
        };

        for pattern in &patterns {
            debug!(pattern = %pattern.pattern, name = ?pattern.name, "Emitting route pattern");
        }
        patterns
    }

    /// Depth-first iteration: each node followed by its children, in order.
    #[must_use]
    pub fn iter(&self) -> SectionIter<'_> {
        SectionIter {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Number of reachable sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// A tree always has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Depth-first pre-order iterator over section ids.
pub struct SectionIter<'t> {
    tree: &'t SectionTree,
    stack: Vec<SectionId>,
}

impl Iterator for SectionIter<'_> {
    type Item = SectionId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for &child in self.tree.node(id).children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// Building cursor: a mutable handle positioned at one section, giving the
/// fluent declarative construction API.
pub struct SectionMut<'t> {
    tree: &'t mut SectionTree,
    id: SectionId,
}

impl<'t> SectionMut<'t> {
    /// The section this cursor points at.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Add a child section and return a cursor to it.
    ///
    /// # Errors
    ///
    /// [`SectionError::EmptyChildUrl`] when `url` is empty - use
    /// [`SectionMut::first`] for a child at this section's own URL.
    pub fn add(&mut self, url: &str) -> Result<SectionMut<'_>, SectionError> {
        let id = self.tree.add(self.id, url)?;
        Ok(SectionMut {
            tree: &mut *self.tree,
            id,
        })
    }

    /// Add (or replace) the child sitting at this section's own URL and
    /// return a cursor to it.
    pub fn first(&mut self) -> SectionMut<'_> {
        let id = self.tree.first(self.id);
        SectionMut {
            tree: &mut *self.tree,
            id,
        }
    }

    /// Patch this section's options in place. Fluent.
    #[must_use]
    pub fn base(self, patch: impl FnOnce(&mut Options)) -> Self {
        self.tree.options_mut(self.id).update(patch);
        self
    }

    /// Set the routing name. Fluent.
    #[must_use]
    pub fn with_name(self, name: &str) -> Self {
        self.tree.node_mut(self.id).name = Some(name.to_string());
        self
    }

    /// Match this section's URL segment as a named capture group. Fluent.
    #[must_use]
    pub fn with_capture(self, capture: &str) -> Self {
        self.tree.options_mut(self.id).capture = Some(capture.to_string());
        self
    }
}
