//! Depth-first resolver and its visitor seam.

use crate::policy::InheritPolicy;
use crate::scope_stack::{DEFAULT_SCOPE_CAPACITY, ScopeStack};
use core::fmt;
use css::Stylesheet;
use css_selectors::{MatchCache, match_rules};
use html::ElementTree;
use indextree::NodeId;
use log::{debug, trace, warn};
use serde::ser::{SerializeMap as _, Serializer};
use serde::Serialize;
use syntax::{DeclarationMap, Value};
use thiserror::Error;

/// Where a resolved value came from, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Layer {
    /// A rule matched by an ancestor.
    Inherited,
    /// A rule matched by the element itself.
    Rule,
    /// The element's own attributes and `style` declarations.
    Inline,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedValue {
    pub value: Value,
    pub layer: Layer,
}

/// Final attribute values of one element, in first-set order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStyle {
    entries: Vec<(String, ResolvedValue)>,
}

impl ResolvedStyle {
    /// Set `name`, replacing any earlier value in place.
    pub fn set(&mut self, name: &str, value: Value, layer: Layer) {
        let resolved = ResolvedValue { value, layer };
        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.0 == name) {
            slot.1 = resolved;
        } else {
            self.entries.push((name.to_owned(), resolved));
        }
    }

    /// Set every entry of `declarations` at `layer`.
    pub fn merge(&mut self, declarations: &DeclarationMap, layer: Layer) {
        for (name, value) in declarations.iter() {
            self.set(name, value.clone(), layer);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.resolved(name).map(|resolved| &resolved.value)
    }

    pub fn resolved(&self, name: &str) -> Option<&ResolvedValue> {
        self.entries
            .iter()
            .find(|entry| entry.0 == name)
            .map(|entry| &entry.1)
    }

    pub fn layer_of(&self, name: &str) -> Option<Layer> {
        self.resolved(name).map(|resolved| resolved.layer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.entries
            .iter()
            .map(|entry| (entry.0.as_str(), &entry.1))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The values without their layers.
    pub fn to_declarations(&self) -> DeclarationMap {
        self.entries
            .iter()
            .map(|entry| (entry.0.as_str(), entry.1.value.clone()))
            .collect()
    }
}

impl Serialize for ResolvedStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, resolved) in &self.entries {
            map.serialize_entry(name, &resolved.value)?;
        }
        map.end()
    }
}

/// What the traversal does after visiting an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Visit the children, then call [`CascadeVisitor::leave`].
    Descend,
    /// Do not visit the children.
    SkipChildren,
}

/// Receives every element with its resolved style, in document order.
pub trait CascadeVisitor {
    type Error: fmt::Display;

    /// Handle one element. An error skips the element's subtree and is recorded in the
    /// [`TraversalReport`]; siblings are still visited.
    ///
    /// # Errors
    /// Any node-local failure.
    fn visit(
        &mut self,
        tree: &ElementTree,
        node: NodeId,
        depth: usize,
        style: &ResolvedStyle,
    ) -> Result<VisitOutcome, Self::Error>;

    /// Called after the children of an element that returned [`VisitOutcome::Descend`].
    #[inline]
    fn leave(&mut self, _tree: &ElementTree, _node: NodeId) {}
}

/// A node-local failure recorded during traversal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (<{tag}> at depth {depth})")]
pub struct NodeFailure {
    pub message: String,
    pub tag: String,
    pub depth: usize,
}

/// Summary of one traversal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraversalReport {
    pub visited: usize,
    /// Subtrees not descended into because the visitor asked to skip them.
    pub skipped_subtrees: usize,
    pub failures: Vec<NodeFailure>,
    pub max_depth: usize,
}

impl TraversalReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolver settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    pub policy: InheritPolicy,
    /// Initial capacity of the scope stack.
    pub scope_capacity: usize,
    /// Dump the scope stack at trace level for every element.
    pub trace_scope: bool,
}

impl Default for ResolverOptions {
    #[inline]
    fn default() -> Self {
        Self {
            policy: InheritPolicy::default(),
            scope_capacity: DEFAULT_SCOPE_CAPACITY,
            trace_scope: false,
        }
    }
}

/// Resolves a stylesheet against element trees.
///
/// Owns its scope stack and a match cache that is reset at the start of every traversal.
pub struct CascadeResolver<'sheet> {
    sheet: &'sheet Stylesheet,
    options: ResolverOptions,
    stack: ScopeStack,
    cache: MatchCache,
}

impl<'sheet> CascadeResolver<'sheet> {
    pub fn new(sheet: &'sheet Stylesheet) -> Self {
        Self::with_options(sheet, ResolverOptions::default())
    }

    pub fn with_options(sheet: &'sheet Stylesheet, options: ResolverOptions) -> Self {
        Self {
            sheet,
            stack: ScopeStack::with_capacity(options.scope_capacity),
            options,
            cache: MatchCache::default(),
        }
    }

    /// The scope stack; balanced between traversals.
    #[inline]
    pub const fn scope_stack(&self) -> &ScopeStack {
        &self.stack
    }

    /// Visit every element of `tree` once, in document order.
    pub fn resolve<V: CascadeVisitor>(
        &mut self,
        tree: &ElementTree,
        visitor: &mut V,
    ) -> TraversalReport {
        self.cache.clear();
        let mut walk = Walk {
            sheet: self.sheet,
            options: &self.options,
            cache: &mut self.cache,
            tree,
            visitor,
            report: TraversalReport::default(),
        };
        for &root in tree.roots() {
            walk.visit(&mut self.stack, root);
        }
        let report = walk.report;
        debug_assert!(self.stack.is_balanced(), "scope stack left unbalanced");
        let (hits, misses) = self.cache.counters();
        debug!(
            "cascade visited {} elements (max depth {}), {} skipped, {} failed, cache {hits}/{misses}",
            report.visited,
            report.max_depth,
            report.skipped_subtrees,
            report.failures.len()
        );
        report
    }
}

/// State of one traversal, kept apart from the scope stack so both can be borrowed.
struct Walk<'run, V> {
    sheet: &'run Stylesheet,
    options: &'run ResolverOptions,
    cache: &'run mut MatchCache,
    tree: &'run ElementTree,
    visitor: &'run mut V,
    report: TraversalReport,
}

impl<V: CascadeVisitor> Walk<'_, V> {
    fn visit(&mut self, stack: &mut ScopeStack, node: NodeId) {
        let tree = self.tree;
        let Some(element) = tree.node(node) else {
            return;
        };
        let mut scope = stack.enter();
        let depth = scope.depth();
        self.report.visited = self.report.visited.saturating_add(1);
        self.report.max_depth = self.report.max_depth.max(depth);

        let mut style = ResolvedStyle::default();
        for entry in scope.active() {
            let Some(rule) = self.sheet.rules.get(entry.rule) else {
                continue;
            };
            for (name, value) in rule.declarations.iter() {
                if self.options.policy.inherits(name) {
                    style.set(name, value.clone(), Layer::Inherited);
                }
            }
        }

        for index in match_rules(tree, node, &self.sheet.rules, self.cache) {
            let Some(rule) = self.sheet.rules.get(index) else {
                continue;
            };
            style.merge(&rule.declarations, Layer::Rule);
            if rule
                .declarations
                .names()
                .any(|name| self.options.policy.inherits(name))
            {
                scope.push(index);
            }
        }

        style.merge(element.attrs(), Layer::Inline);
        if self.options.trace_scope {
            scope.trace_dump(element.tag());
        }
        trace!("<{}> at depth {depth}: {} values", element.tag(), style.len());

        match self.visitor.visit(tree, node, depth, &style) {
            Ok(VisitOutcome::Descend) => {
                for child in tree.children(node) {
                    self.visit(&mut scope, child);
                }
                self.visitor.leave(tree, node);
            }
            Ok(VisitOutcome::SkipChildren) => {
                self.report.skipped_subtrees = self.report.skipped_subtrees.saturating_add(1);
            }
            Err(error) => {
                warn!("<{}> at depth {depth} failed: {error}", element.tag());
                self.report.failures.push(NodeFailure {
                    message: error.to_string(),
                    tag: element.tag().to_owned(),
                    depth,
                });
            }
        }
    }
}

/// Collects `(pre-order index, tag, style)` for every element.
#[derive(Default)]
struct Collector {
    resolved: Vec<(usize, String, ResolvedStyle)>,
}

impl CascadeVisitor for Collector {
    type Error = fmt::Error;

    fn visit(
        &mut self,
        tree: &ElementTree,
        node: NodeId,
        _depth: usize,
        style: &ResolvedStyle,
    ) -> Result<VisitOutcome, fmt::Error> {
        let tag = tree.node(node).map(|element| element.tag().to_owned()).unwrap_or_default();
        self.resolved.push((self.resolved.len(), tag, style.clone()));
        Ok(VisitOutcome::Descend)
    }
}

/// Resolve every element of `tree` against `sheet` with default options.
pub fn resolve_all(tree: &ElementTree, sheet: &Stylesheet) -> Vec<(usize, String, ResolvedStyle)> {
    resolve_all_with(tree, sheet, ResolverOptions::default())
}

/// [`resolve_all`] with explicit options.
pub fn resolve_all_with(
    tree: &ElementTree,
    sheet: &Stylesheet,
    options: ResolverOptions,
) -> Vec<(usize, String, ResolvedStyle)> {
    let mut collector = Collector::default();
    CascadeResolver::with_options(sheet, options).resolve(tree, &mut collector);
    collector.resolved
}
