//! Attribute handlers: per-attribute hooks that push resolved values into created nodes.

mod stock;

pub use stock::{BackgroundHandler, ColorHandler, HrefHandler, SizeHandler, SrcHandler, parse_color};

use crate::adapters::{ImageAdapter, LinkHandler};
use crate::error::AttributeApplyError;
use crate::tree::RenderNode;
use core::fmt;
use indextree::NodeId;
use syntax::Value;

/// Applies one attribute to created nodes.
pub trait AttributeHandler<N> {
    /// Apply a resolved value. `is_ancestor_scoped` is set when the value came from a rule
    /// matched by an ancestor rather than by the node itself.
    ///
    /// # Errors
    /// An [`AttributeApplyError`] is logged and the attribute skipped.
    fn apply(
        &self,
        target: NodeId,
        node: &mut RenderNode<N>,
        value: &Value,
        is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError>;

    /// Called when the node has no value for this attribute.
    ///
    /// # Errors
    /// An [`AttributeApplyError`] is logged and the attribute skipped.
    #[inline]
    fn set_default(
        &self,
        _target: NodeId,
        _node: &mut RenderNode<N>,
    ) -> Result<(), AttributeApplyError> {
        Ok(())
    }
}

/// Attribute handlers keyed by attribute name, in registration order.
pub struct HandlerRegistry<N> {
    handlers: Vec<(String, Box<dyn AttributeHandler<N>>)>,
}

impl<N> Default for HandlerRegistry<N> {
    #[inline]
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<N> fmt::Debug for HandlerRegistry<N> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_list()
            .entries(self.handlers.iter().map(|(name, _)| name))
            .finish()
    }
}

impl<N> HandlerRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock handlers: `src` and `href` through the given adapters, `color`,
    /// `background-color`, `width` and `height`.
    pub fn stock<I, L>(images: I, links: L) -> Self
    where
        I: ImageAdapter + 'static,
        L: LinkHandler + 'static,
    {
        let mut registry = Self::new();
        registry
            .register("width", SizeHandler::Width)
            .register("height", SizeHandler::Height)
            .register("color", ColorHandler)
            .register("background-color", BackgroundHandler)
            .register("src", SrcHandler::new(images))
            .register("href", HrefHandler::new(links));
        registry
    }

    /// Register `handler` for `attribute`, replacing any earlier handler for it.
    pub fn register<H>(&mut self, attribute: &str, handler: H) -> &mut Self
    where
        H: AttributeHandler<N> + 'static,
    {
        let name = attribute.to_ascii_lowercase();
        let boxed: Box<dyn AttributeHandler<N>> = Box::new(handler);
        if let Some(slot) = self.handlers.iter_mut().find(|(known, _)| *known == name) {
            slot.1 = boxed;
        } else {
            self.handlers.push((name, boxed));
        }
        self
    }

    pub fn get(&self, attribute: &str) -> Option<&dyn AttributeHandler<N>> {
        self.handlers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
            .map(|(_, handler)| handler.as_ref())
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn AttributeHandler<N>)> {
        self.handlers
            .iter()
            .map(|(name, handler)| (name.as_str(), handler.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
