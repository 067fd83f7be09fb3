//! Single-pass cascade over an element tree.
//!
//! Every element is visited exactly once, depth first. Its resolved style is built from
//! three layers, weakest first:
//! 1. declarations of rules matched by ancestors, still active on the [`ScopeStack`],
//! 2. declarations of the rules matching the element, in sheet order,
//! 3. the element's inline declarations.
//!
//! Rules matched by an element are pushed on the scope stack tagged with the element's
//! depth and popped when the traversal returns from that element, so siblings and their
//! subtrees never see each other's scopes.

#![forbid(unsafe_code)]

mod policy;
mod resolver;
mod scope_stack;

pub use policy::{InheritPolicy, is_inherited_property};
pub use resolver::{
    CascadeResolver, CascadeVisitor, Layer, NodeFailure, ResolvedStyle, ResolvedValue,
    ResolverOptions, TraversalReport, VisitOutcome, resolve_all, resolve_all_with,
};
pub use scope_stack::{DEFAULT_SCOPE_CAPACITY, ScopeEntry, ScopeGuard, ScopeStack};
