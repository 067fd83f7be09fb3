//! Host-side services used by stock handlers and factories.

use crate::error::NodeCreationError;
use crate::factory::{LayoutHints, NodeFactory, NodeSpec};
use alloc::rc::Rc;
use indextree::NodeId;

/// Loads images into nodes.
pub trait ImageAdapter {
    /// Start loading `url` into the node `target`.
    ///
    /// # Errors
    /// A message describing why the request was refused.
    fn set_image(&self, url: &str, target: NodeId) -> Result<(), String>;
}

/// Receives link targets of clickable nodes.
pub trait LinkHandler {
    /// Make `target` open `url` when activated.
    ///
    /// # Errors
    /// A message describing why the link was refused.
    fn register(&self, url: &str, target: NodeId) -> Result<(), String>;
}

/// Builds embedded web views.
pub trait WebViewCreator {
    type Node;

    /// # Errors
    /// A [`NodeCreationError`] when the host cannot provide a web view.
    fn create(&self) -> Result<Self::Node, NodeCreationError>;
}

impl<A: ImageAdapter + ?Sized> ImageAdapter for Rc<A> {
    #[inline]
    fn set_image(&self, url: &str, target: NodeId) -> Result<(), String> {
        (**self).set_image(url, target)
    }
}

impl<L: LinkHandler + ?Sized> LinkHandler for Rc<L> {
    #[inline]
    fn register(&self, url: &str, target: NodeId) -> Result<(), String> {
        (**self).register(url, target)
    }
}

/// Discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAdapter;

impl ImageAdapter for NoopAdapter {
    #[inline]
    fn set_image(&self, _url: &str, _target: NodeId) -> Result<(), String> {
        Ok(())
    }
}

impl LinkHandler for NoopAdapter {
    #[inline]
    fn register(&self, _url: &str, _target: NodeId) -> Result<(), String> {
        Ok(())
    }
}

/// Node kind served by [`WebViewFactory`].
pub const WEB_VIEW: &str = "webview";

/// A factory that builds `webview` nodes through a [`WebViewCreator`] and everything else
/// through the wrapped factory.
#[derive(Debug)]
pub struct WebViewFactory<F, C> {
    inner: F,
    creator: C,
}

impl<F, C> WebViewFactory<F, C> {
    pub const fn new(inner: F, creator: C) -> Self {
        Self { inner, creator }
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F, C> NodeFactory for WebViewFactory<F, C>
where
    F: NodeFactory,
    C: WebViewCreator<Node = F::Node>,
{
    type Node = F::Node;

    fn create(&mut self, spec: &NodeSpec<'_>) -> Result<Option<F::Node>, NodeCreationError> {
        if spec.kind == WEB_VIEW {
            return self.creator.create().map(Some);
        }
        self.inner.create(spec)
    }

    #[inline]
    fn is_container(&self, node: &F::Node) -> bool {
        self.inner.is_container(node)
    }

    #[inline]
    fn child_layout(&self, node: &F::Node) -> Option<LayoutHints> {
        self.inner.child_layout(node)
    }
}
