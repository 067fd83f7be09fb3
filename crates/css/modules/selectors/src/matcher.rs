//! Matching selector chains against elements.

use crate::{Component, ElementAdapter, MatchCache, SelectorChain, SelectorError};
use log::trace;

/// Anything that may carry a selector chain, such as a stylesheet rule.
pub trait SelectorSource {
    /// The chain to match, or `None` when the selector failed to parse.
    fn selector(&self) -> Option<&SelectorChain>;
}

impl SelectorSource for SelectorChain {
    #[inline]
    fn selector(&self) -> Option<&SelectorChain> {
        Some(self)
    }
}

impl SelectorSource for Result<SelectorChain, SelectorError> {
    #[inline]
    fn selector(&self) -> Option<&SelectorChain> {
        self.as_ref().ok()
    }
}

/// Match one component against a single element.
///
/// Tags compare ASCII case-insensitively; ids and classes compare exactly.
pub fn matches_component<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    component: &Component,
) -> bool {
    if let Some(tag) = &component.tag
        && !adapter.tag_name(element).eq_ignore_ascii_case(tag)
    {
        return false;
    }
    if let Some(id) = &component.id
        && adapter.element_id(element) != Some(id.as_str())
    {
        return false;
    }
    component
        .classes
        .iter()
        .all(|class| adapter.has_class(element, class))
}

/// Match a whole chain: the head against `element`, then each further component against
/// some ancestor strictly above the element matched by the previous component.
/// Each step takes the nearest matching ancestor.
pub fn matches_chain<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    chain: &SelectorChain,
) -> bool {
    if !matches_component(adapter, element, chain.head()) {
        return false;
    }
    let mut matched = element;
    for component in chain.ancestors() {
        let mut current_parent = adapter.parent(matched);
        loop {
            let Some(ancestor) = current_parent else {
                return false;
            };
            if matches_component(adapter, ancestor, component) {
                matched = ancestor;
                break;
            }
            current_parent = adapter.parent(ancestor);
        }
    }
    true
}

/// Indices of the rules matching `element`, in sheet order.
///
/// Rules without a valid selector never match. Results are memoized in `cache` under the
/// element's unique key and the chain's structural key.
pub fn match_rules<A: ElementAdapter, R: SelectorSource>(
    adapter: &A,
    element: A::Handle,
    rules: &[R],
    cache: &mut MatchCache,
) -> Vec<usize> {
    let element_key = adapter.unique_key(element);
    let mut matched = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        let Some(chain) = rule.selector() else {
            continue;
        };
        let hit = if let Some(cached) = cache.get(element_key, chain.key()) {
            cached
        } else {
            let computed = matches_chain(adapter, element, chain);
            cache.set(element_key, chain.key(), computed);
            computed
        };
        if hit {
            trace!("rule {index} ({chain}) matches element {element_key}");
            matched.push(index);
        }
    }
    matched
}
