#![cfg(test)]

use css_cascade::{DEFAULT_SCOPE_CAPACITY, InheritPolicy};
use renderer::{RenderConfig, parse_inherit};
use std::env;

#[test]
fn defaults_match_component_defaults() {
    let config = RenderConfig::default();
    assert_eq!(config.pool_capacity, 20);
    assert_eq!(config.scope_capacity, DEFAULT_SCOPE_CAPACITY);
    assert_eq!(config.max_depth, 256);
    assert_eq!(config.inherit, InheritPolicy::All);
    assert!(!config.trace_scope);
}

#[test]
fn derived_options_follow_config() {
    let config = RenderConfig {
        scope_capacity: 8,
        max_depth: 3,
        inherit: InheritPolicy::css_defaults(),
        trace_scope: true,
        ..RenderConfig::default()
    };
    assert_eq!(config.parse_options().max_depth, 3);
    let options = config.resolver_options();
    assert_eq!(options.scope_capacity, 8);
    assert!(options.trace_scope);
    assert!(options.policy.inherits("color"));
    assert!(!options.policy.inherits("width"));
}

#[test]
fn inherit_modes() {
    assert_eq!(parse_inherit("all"), Some(InheritPolicy::All));
    assert_eq!(parse_inherit(" CSS "), Some(InheritPolicy::css_defaults()));
    assert_eq!(parse_inherit("some"), None);
}

#[test]
fn environment_without_overrides_gives_defaults() {
    let overridden = [
        "MARKUP_POOL_CAPACITY",
        "MARKUP_SCOPE_CAPACITY",
        "MARKUP_MAX_DEPTH",
        "MARKUP_INHERIT",
        "MARKUP_TRACE_SCOPE",
    ]
    .iter()
    .any(|name| env::var(name).is_ok());
    if !overridden {
        assert_eq!(RenderConfig::from_env(), RenderConfig::default());
    }
}
