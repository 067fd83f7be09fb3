//! Configuration settings for a render.
//!
//! Controls token pool sizing, scope stack pre-allocation, the nesting limit of the markup
//! parser and which properties flow from ancestors to descendants. Configuration can be
//! loaded from environment variables or constructed programmatically.

use css_cascade::{DEFAULT_SCOPE_CAPACITY, InheritPolicy, ResolverOptions};
use html::{DEFAULT_MAX_DEPTH, ParseOptions};
use std::env;
use syntax::DEFAULT_POOL_CAPACITY;

/// Runtime configuration for [`crate::render_document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Number of retired tokens kept for reuse by the lexer
    pub pool_capacity: usize,
    /// Initial capacity of the cascade scope stack
    pub scope_capacity: usize,
    /// Deepest allowed element nesting
    pub max_depth: usize,
    /// Which ancestor-scoped declarations reach descendants
    pub inherit: InheritPolicy,
    /// Whether to dump the scope stack at trace level for every element
    pub trace_scope: bool,
}

impl Default for RenderConfig {
    #[inline]
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            scope_capacity: DEFAULT_SCOPE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            inherit: InheritPolicy::All,
            trace_scope: false,
        }
    }
}

impl RenderConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `MARKUP_POOL_CAPACITY`: Token pool capacity (default: 20)
    /// - `MARKUP_SCOPE_CAPACITY`: Initial scope stack capacity (default: 50)
    /// - `MARKUP_MAX_DEPTH`: Deepest allowed element nesting (default: 256, minimum 1)
    /// - `MARKUP_INHERIT`: `all` to pass every ancestor declaration down, `css` for the
    ///   inherited CSS properties only (default: `all`)
    /// - `MARKUP_TRACE_SCOPE`: Set to "1" to trace the scope stack (default: disabled)
    ///
    /// Unparseable values fall back to their defaults.
    ///
    /// # Returns
    ///
    /// A new `RenderConfig` instance populated from environment variables
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let pool_capacity = env::var("MARKUP_POOL_CAPACITY")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_POOL_CAPACITY);
        let scope_capacity = env::var("MARKUP_SCOPE_CAPACITY")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_SCOPE_CAPACITY);
        let max_depth = env::var("MARKUP_MAX_DEPTH")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_DEPTH)
            .max(1);
        let inherit = env::var("MARKUP_INHERIT")
            .ok()
            .and_then(|val| parse_inherit(&val))
            .unwrap_or_default();
        let trace_scope = env::var("MARKUP_TRACE_SCOPE").ok().as_deref() == Some("1");
        Self {
            pool_capacity,
            scope_capacity,
            max_depth,
            inherit,
            trace_scope,
        }
    }

    /// Parser settings derived from this configuration.
    #[inline]
    #[must_use]
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
        }
    }

    /// Resolver settings derived from this configuration.
    #[inline]
    #[must_use]
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            policy: self.inherit.clone(),
            scope_capacity: self.scope_capacity,
            trace_scope: self.trace_scope,
        }
    }
}

/// Parse an inheritance mode name.
///
/// # Returns
///
/// The policy for `all` or `css` (case-insensitive), `None` for anything else
#[inline]
#[must_use]
pub fn parse_inherit(mode: &str) -> Option<InheritPolicy> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "all" => Some(InheritPolicy::All),
        "css" => Some(InheritPolicy::css_defaults()),
        _ => None,
    }
}
