use super::AttributeHandler;
use crate::adapters::{ImageAdapter, LinkHandler};
use crate::error::AttributeApplyError;
use crate::factory::Length;
use crate::tree::{RenderNode, Rgba};
use csscolorparser::Color;
use indextree::NodeId;
use syntax::Value;

/// Node kind accepting `src`.
const IMAGE: &str = "image";

fn invalid(attribute: &str, value: &Value) -> AttributeApplyError {
    AttributeApplyError::InvalidValue {
        attribute: attribute.to_owned(),
        value: value.to_string(),
    }
}

/// Parse a colour value into 8-bit RGBA channels.
///
/// Accepts named colours, hex forms and the functional notations `csscolorparser` knows.
pub fn parse_color(value: &Value) -> Option<Rgba> {
    let parsed: Color = value.as_text()?.parse().ok()?;
    Some(parsed.to_rgba8())
}

/// `width` and `height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeHandler {
    Width,
    Height,
}

impl SizeHandler {
    const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

impl<N> AttributeHandler<N> for SizeHandler {
    fn apply(
        &self,
        _target: NodeId,
        node: &mut RenderNode<N>,
        value: &Value,
        is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError> {
        if is_ancestor_scoped {
            return Ok(());
        }
        let length = Length::from_value(value).ok_or_else(|| invalid(self.name(), value))?;
        match self {
            Self::Width => node.layout.width = length,
            Self::Height => node.layout.height = length,
        }
        Ok(())
    }
}

/// `color`; ancestor-scoped values apply too.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorHandler;

impl<N> AttributeHandler<N> for ColorHandler {
    fn apply(
        &self,
        _target: NodeId,
        node: &mut RenderNode<N>,
        value: &Value,
        _is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError> {
        node.foreground = Some(parse_color(value).ok_or_else(|| invalid("color", value))?);
        Ok(())
    }
}

/// `background-color`; only values matched by the node itself apply.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackgroundHandler;

impl<N> AttributeHandler<N> for BackgroundHandler {
    fn apply(
        &self,
        _target: NodeId,
        node: &mut RenderNode<N>,
        value: &Value,
        is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError> {
        if is_ancestor_scoped {
            return Ok(());
        }
        node.background =
            Some(parse_color(value).ok_or_else(|| invalid("background-color", value))?);
        Ok(())
    }
}

/// `src` of image nodes, loaded through an [`ImageAdapter`]. Images default to full width.
#[derive(Clone, Debug)]
pub struct SrcHandler<A> {
    images: A,
}

impl<A: ImageAdapter> SrcHandler<A> {
    pub const fn new(images: A) -> Self {
        Self { images }
    }
}

impl<N, A: ImageAdapter> AttributeHandler<N> for SrcHandler<A> {
    fn apply(
        &self,
        target: NodeId,
        node: &mut RenderNode<N>,
        value: &Value,
        is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError> {
        if is_ancestor_scoped {
            return Ok(());
        }
        if node.kind != IMAGE {
            return Err(AttributeApplyError::Unsupported {
                attribute: "src".to_owned(),
                kind: node.kind.clone(),
            });
        }
        let url = value.as_text().ok_or_else(|| invalid("src", value))?;
        self.images
            .set_image(url, target)
            .map_err(|reason| AttributeApplyError::Adapter {
                attribute: "src".to_owned(),
                reason,
            })
    }

    fn set_default(
        &self,
        _target: NodeId,
        node: &mut RenderNode<N>,
    ) -> Result<(), AttributeApplyError> {
        if node.kind == IMAGE {
            node.layout.width = Length::MatchParent;
        }
        Ok(())
    }
}

/// `href`, registered with a [`LinkHandler`].
#[derive(Clone, Debug)]
pub struct HrefHandler<L> {
    links: L,
}

impl<L: LinkHandler> HrefHandler<L> {
    pub const fn new(links: L) -> Self {
        Self { links }
    }
}

impl<N, L: LinkHandler> AttributeHandler<N> for HrefHandler<L> {
    fn apply(
        &self,
        target: NodeId,
        _node: &mut RenderNode<N>,
        value: &Value,
        is_ancestor_scoped: bool,
    ) -> Result<(), AttributeApplyError> {
        if is_ancestor_scoped {
            return Ok(());
        }
        let url = value.as_text().ok_or_else(|| invalid("href", value))?;
        self.links
            .register(url, target)
            .map_err(|reason| AttributeApplyError::Adapter {
                attribute: "href".to_owned(),
                reason,
            })
    }
}
