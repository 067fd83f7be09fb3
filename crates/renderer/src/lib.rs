//! Markup plus stylesheet to a tree of host nodes.
//!
//! The host supplies a [`NodeFactory`] that builds its nodes and a [`HandlerRegistry`] of
//! per-attribute [`AttributeHandler`]s; [`render_document`] parses, resolves the cascade
//! in one pass and hands every element to both.

#![forbid(unsafe_code)]

extern crate alloc;

mod adapters;
mod config;
mod error;
mod factory;
mod handlers;
mod relations;
mod render;
mod tree;

pub use adapters::{ImageAdapter, LinkHandler, NoopAdapter, WEB_VIEW, WebViewCreator, WebViewFactory};
pub use config::{RenderConfig, parse_inherit};
pub use error::{AttributeApplyError, DocumentError, NodeCreationError, RenderError};
pub use factory::{LayoutHints, Length, NodeFactory, NodeSpec};
pub use handlers::{
    AttributeHandler, BackgroundHandler, ColorHandler, HandlerRegistry, HrefHandler, SizeHandler,
    SrcHandler, parse_color,
};
pub use relations::{ABSOLUTE_BOX, ContainerTable, FLEX_BOX, LINEAR_BOX, ViewRelations};
pub use render::{
    OutlineFactory, RenderObserver, RenderOutcome, Renderer, render_document, render_str,
};
pub use tree::{Omission, RenderNode, RenderTree, Rgba};
