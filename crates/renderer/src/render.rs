//! Document to render tree.
//!
//! A render parses the markup and the stylesheets, then resolves the cascade once over
//! the element tree. Every resolved element is mapped to a node kind, built by the
//! [`NodeFactory`], attached under its parent's node and passed through the registered
//! attribute handlers.

use crate::adapters::NoopAdapter;
use crate::config::RenderConfig;
use crate::error::{DocumentError, NodeCreationError, RenderError};
use crate::factory::{LayoutHints, NodeFactory, NodeSpec};
use crate::handlers::HandlerRegistry;
use crate::relations::{ContainerTable, ViewRelations};
use crate::tree::{Omission, RenderNode, RenderTree};
use anyhow::Context as _;
use css::{Stylesheet, parse_stylesheet};
use css_cascade::{CascadeResolver, CascadeVisitor, Layer, ResolvedStyle, VisitOutcome};
use html::{ElementTree, parse_document};
use indextree::NodeId;
use log::{debug, trace, warn};
use syntax::TokenPool;
use tracing::info_span;

/// Lifecycle hooks around a render.
pub trait RenderObserver<N> {
    /// Before the first node is created.
    #[inline]
    fn on_create(&mut self) {}

    /// After every node has been created and its attributes applied.
    #[inline]
    fn on_loaded(&mut self, _tree: &RenderTree<N>) {}
}

impl<N> RenderObserver<N> for () {}

/// Result of a render that got past parsing.
#[derive(Debug)]
pub struct RenderOutcome<N> {
    pub tree: RenderTree<N>,
    /// Elements whose subtree could not be built.
    pub failures: Vec<RenderError>,
    /// Elements left out because no node exists for them.
    pub omissions: Vec<Omission>,
    /// Elements visited by the cascade.
    pub visited: usize,
}

impl<N> RenderOutcome<N> {
    /// Whether every element produced a node.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.omissions.is_empty()
    }
}

/// Renders documents with one factory, handler registry and kind tables.
pub struct Renderer<'run, F: NodeFactory> {
    factory: &'run mut F,
    handlers: &'run HandlerRegistry<F::Node>,
    relations: ViewRelations,
    containers: ContainerTable,
}

impl<'run, F: NodeFactory> Renderer<'run, F> {
    pub fn new(factory: &'run mut F, handlers: &'run HandlerRegistry<F::Node>) -> Self {
        Self {
            factory,
            handlers,
            relations: ViewRelations::default(),
            containers: ContainerTable::default(),
        }
    }

    #[must_use]
    pub fn with_relations(mut self, relations: ViewRelations) -> Self {
        self.relations = relations;
        self
    }

    #[must_use]
    pub fn with_containers(mut self, containers: ContainerTable) -> Self {
        self.containers = containers;
        self
    }

    /// Render `markup` styled by `stylesheet` and the document's own `<style>` elements,
    /// which come after `stylesheet` in rule order.
    ///
    /// # Errors
    /// A [`DocumentError`] when the markup or a stylesheet cannot be parsed. Node-local
    /// failures are reported in the [`RenderOutcome`] instead.
    pub fn render(
        &mut self,
        markup: &str,
        stylesheet: &str,
        config: &RenderConfig,
    ) -> Result<RenderOutcome<F::Node>, DocumentError> {
        self.render_observed(markup, stylesheet, config, &mut ())
    }

    /// [`Renderer::render`] with lifecycle hooks.
    ///
    /// # Errors
    /// See [`Renderer::render`]; `observer` is not called when parsing fails.
    pub fn render_observed<O: RenderObserver<F::Node>>(
        &mut self,
        markup: &str,
        stylesheet: &str,
        config: &RenderConfig,
        observer: &mut O,
    ) -> Result<RenderOutcome<F::Node>, DocumentError> {
        let _span = info_span!("render.document").entered();
        let mut pool = TokenPool::with_capacity(config.pool_capacity);
        let document = parse_document(markup, &mut pool, &config.parse_options())?;
        let mut sheet = parse_stylesheet(stylesheet, &mut pool)?;
        for source in &document.styles {
            sheet.append(parse_stylesheet(source, &mut pool)?);
        }
        let stats = pool.stats();
        debug!(
            "parsed {} elements and {} rules (token pool {stats:?})",
            document.tree.len(),
            sheet.len()
        );

        observer.on_create();
        let outcome = self.build(&document.tree, &sheet, config);
        observer.on_loaded(&outcome.tree);
        Ok(outcome)
    }

    fn build(
        &mut self,
        elements: &ElementTree,
        sheet: &Stylesheet,
        config: &RenderConfig,
    ) -> RenderOutcome<F::Node> {
        let _span = info_span!("render.build").entered();
        let mut builder = Builder {
            factory: &mut *self.factory,
            handlers: self.handlers,
            relations: &self.relations,
            containers: &self.containers,
            tree: RenderTree::default(),
            parents: Vec::new(),
            omissions: Vec::new(),
        };
        let mut resolver = CascadeResolver::with_options(sheet, config.resolver_options());
        let report = resolver.resolve(elements, &mut builder);
        debug!(
            "rendered {} nodes from {} elements, {} omitted, {} failed",
            builder.tree.len(),
            report.visited,
            builder.omissions.len(),
            report.failures.len()
        );
        RenderOutcome {
            tree: builder.tree,
            failures: report
                .failures
                .into_iter()
                .map(|failure| RenderError {
                    message: failure.message,
                    tag: failure.tag,
                    depth: failure.depth,
                })
                .collect(),
            omissions: builder.omissions,
            visited: report.visited,
        }
    }
}

/// Node under construction, with its place in the render tree.
struct Parent {
    handle: NodeId,
    child_layout: LayoutHints,
}

/// Cascade visitor that builds the render tree.
struct Builder<'run, F: NodeFactory> {
    factory: &'run mut F,
    handlers: &'run HandlerRegistry<F::Node>,
    relations: &'run ViewRelations,
    containers: &'run ContainerTable,
    tree: RenderTree<F::Node>,
    /// One entry per element currently descended into.
    parents: Vec<Parent>,
    omissions: Vec<Omission>,
}

impl<F: NodeFactory> Builder<'_, F> {
    fn omit(&mut self, tag: &str, depth: usize, reason: String) -> VisitOutcome {
        debug!("<{tag}> at depth {depth} omitted: {reason}");
        self.omissions.push(Omission {
            tag: tag.to_owned(),
            depth,
            reason,
        });
        VisitOutcome::SkipChildren
    }

    /// Run every registered handler on `handle`: defaults for attributes without a value
    /// first, then the resolved values.
    fn apply_attributes(&mut self, handle: NodeId) {
        let Some(node) = self.tree.node_mut(handle) else {
            return;
        };
        let style = node.style.clone();
        for (attribute, handler) in self.handlers.iter() {
            if style.get(attribute).is_none()
                && let Err(error) = handler.set_default(handle, node)
            {
                warn!("<{}> default for {attribute} failed: {error}", node.tag);
            }
        }
        for (attribute, handler) in self.handlers.iter() {
            let Some(resolved) = style.resolved(attribute) else {
                continue;
            };
            let is_ancestor_scoped = resolved.layer == Layer::Inherited;
            if let Err(error) = handler.apply(handle, node, &resolved.value, is_ancestor_scoped) {
                warn!("<{}> {attribute} skipped: {error}", node.tag);
            }
        }
    }
}

impl<F: NodeFactory> CascadeVisitor for Builder<'_, F> {
    type Error = NodeCreationError;

    fn visit(
        &mut self,
        elements: &ElementTree,
        node: NodeId,
        depth: usize,
        style: &ResolvedStyle,
    ) -> Result<VisitOutcome, NodeCreationError> {
        let Some(element) = elements.node(node) else {
            return Ok(VisitOutcome::SkipChildren);
        };
        let relations = self.relations;
        let tag = element.tag();
        let Some(kind) = relations.kind_for(tag, style) else {
            return Ok(self.omit(tag, depth, format!("no node kind for <{tag}>")));
        };
        let spec = NodeSpec {
            kind,
            tag,
            id: element.id(),
            text: element.text(),
            style,
            depth,
        };
        let Some(host) = self.factory.create(&spec)? else {
            return Ok(self.omit(tag, depth, format!("factory has no `{kind}` node")));
        };

        let layout = if relations.is_display_driven(tag) {
            LayoutHints::block()
        } else {
            self.parents
                .last()
                .map_or_else(LayoutHints::default, |parent| parent.child_layout)
        };
        let is_container = self.factory.is_container(&host);
        let child_layout = self
            .factory
            .child_layout(&host)
            .or_else(|| self.containers.child_layout(kind))
            .unwrap_or_default();
        let handle = self.tree.insert(
            self.parents.last().map(|parent| parent.handle),
            RenderNode {
                node: host,
                kind: kind.to_owned(),
                tag: tag.to_owned(),
                id: element.id().map(str::to_owned),
                text: element.text().map(str::to_owned),
                style: style.clone(),
                layout,
                foreground: None,
                background: None,
            },
        );
        self.apply_attributes(handle);
        trace!("<{tag}> built as `{kind}` ({layout:?})");

        if !is_container && elements.children(node).next().is_some() {
            warn!("<{tag}> built as non-container `{kind}`; its children are ignored");
            return Ok(VisitOutcome::SkipChildren);
        }
        self.parents.push(Parent {
            handle,
            child_layout,
        });
        Ok(VisitOutcome::Descend)
    }

    fn leave(&mut self, _elements: &ElementTree, _node: NodeId) {
        self.parents.pop();
    }
}

/// Render with the default [`ViewRelations`] and [`ContainerTable`].
///
/// # Errors
/// See [`Renderer::render`].
pub fn render_document<F: NodeFactory>(
    markup: &str,
    stylesheet: &str,
    factory: &mut F,
    handlers: &HandlerRegistry<F::Node>,
    config: &RenderConfig,
) -> Result<RenderOutcome<F::Node>, DocumentError> {
    Renderer::new(factory, handlers).render(markup, stylesheet, config)
}

/// Builds every kind as a node holding its kind name; kinds in the container table hold
/// children.
#[derive(Clone, Debug, Default)]
pub struct OutlineFactory {
    containers: ContainerTable,
}

impl OutlineFactory {
    pub const fn new(containers: ContainerTable) -> Self {
        Self { containers }
    }
}

impl NodeFactory for OutlineFactory {
    type Node = String;

    fn create(&mut self, spec: &NodeSpec<'_>) -> Result<Option<String>, NodeCreationError> {
        Ok(Some(spec.kind.to_owned()))
    }

    fn is_container(&self, node: &String) -> bool {
        self.containers.is_container(node)
    }
}

/// Render with [`OutlineFactory`], the stock handlers and configuration from the
/// environment, returning the render tree as pretty-printed JSON.
///
/// # Errors
/// Parse failures, with their position, and serialization failures.
pub fn render_str(markup: &str, stylesheet: &str) -> anyhow::Result<String> {
    let config = RenderConfig::from_env();
    let handlers = HandlerRegistry::stock(NoopAdapter, NoopAdapter);
    let mut factory = OutlineFactory::default();
    let outcome = render_document(markup, stylesheet, &mut factory, &handlers, &config)
        .context("failed to render document")?;
    for failure in &outcome.failures {
        warn!("{failure}");
    }
    serde_json::to_string_pretty(&outcome.tree.to_json_value())
        .context("failed to serialize render tree")
}
