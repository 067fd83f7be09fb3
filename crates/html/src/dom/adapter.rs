use super::ElementTree;
use css_selectors::ElementAdapter;
use indextree::NodeId;

impl ElementAdapter for ElementTree {
    type Handle = NodeId;

    #[inline]
    fn unique_key(&self, element: NodeId) -> u64 {
        self.node(element).map_or(u64::MAX, |node| node.key())
    }

    #[inline]
    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.parent_of(element)
    }

    #[inline]
    fn tag_name(&self, element: NodeId) -> &str {
        self.node(element).map_or("", |node| node.tag())
    }

    #[inline]
    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.node(element).and_then(|node| node.id())
    }

    #[inline]
    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.node(element).is_some_and(|node| node.has_class(class))
    }
}
