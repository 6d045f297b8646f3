//! Switch
//!
//! Picks the first child whose pattern matches the unclaimed path. Children
//! are tried in declaration order and the first hit wins, even when a later
//! child would be more specific. No match renders nothing.

use crate::context::RouterContext;
use crate::pattern::{RouteMatch, RoutePattern};

/// One child of a [`Switch`]
#[derive(Debug, Clone)]
pub struct SwitchRoute<V> {
    /// Pattern relative to the switch's mount point
    pub pattern: RoutePattern,
    /// What to render on a match
    pub view: V,
}

/// The child picked by [`Switch::resolve`]
#[derive(Debug)]
pub struct Matched<'a, V> {
    /// Index of the child in declaration order
    pub index: usize,
    /// The child's view
    pub view: &'a V,
    /// Match details
    pub route_match: RouteMatch,
    /// Context for whatever the child mounts below itself
    pub context: RouterContext,
}

/// First-match route selector
#[derive(Debug, Clone)]
pub struct Switch<V> {
    routes: Vec<SwitchRoute<V>>,
}

impl<V> Default for Switch<V> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<V> Switch<V> {
    /// Create an empty switch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child route
    pub fn route(mut self, pattern: &str, view: V) -> Self {
        self.routes.push(SwitchRoute {
            pattern: RoutePattern::parse(pattern),
            view,
        });
        self
    }

    /// Children in declaration order
    pub fn routes(&self) -> &[SwitchRoute<V>] {
        &self.routes
    }

    /// Pick the child to render for `context`, if any
    pub fn resolve(&self, context: &RouterContext) -> Option<Matched<'_, V>> {
        let location = context.location();
        let (index, route, route_match) = self
            .routes
            .iter()
            .enumerate()
            .find_map(|(i, route)| route.pattern.matches(location).map(|m| (i, route, m)))?;

        Some(Matched {
            index,
            view: &route.view,
            context: context.nest(&route_match),
            route_match,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use std::sync::Arc;

    fn context_at(href: &str) -> RouterContext {
        RouterContext::root(Arc::new(MemoryHistory::new(href).unwrap()))
    }

    #[test]
    fn test_first_match_wins() {
        let switch = Switch::new().route("a/:id", "param").route("a/b", "static");
        let matched = switch.resolve(&context_at("/a/b")).unwrap();
        assert_eq!(*matched.view, "param");
        assert_eq!(matched.index, 0);
        assert_eq!(matched.route_match.param("id"), Some("b"));
    }

    #[test]
    fn test_static_wins_when_declared_first() {
        let switch = Switch::new().route("a/b", "static").route("a/:id", "param");
        assert_eq!(*switch.resolve(&context_at("/a/b")).unwrap().view, "static");
        assert_eq!(*switch.resolve(&context_at("/a/c")).unwrap().view, "param");
    }

    #[test]
    fn test_no_match_renders_nothing() {
        let switch = Switch::new().route("home", 1).route("items/:id", 2);
        assert!(switch.resolve(&context_at("/missing")).is_none());
    }

    #[test]
    fn test_catch_all_as_not_found() {
        let switch = Switch::new().route("home", "home").route("*", "not-found");
        assert_eq!(*switch.resolve(&context_at("/nope/deeper")).unwrap().view, "not-found");
    }

    #[test]
    fn test_nested_switches() {
        let outer = Switch::new().route("settings/*", "settings");
        let inner = Switch::new().route("", "index").route("account", "account");

        let root = context_at("/settings/account");
        let matched = outer.resolve(&root).unwrap();
        let nested = inner.resolve(&matched.context).unwrap();
        assert_eq!(*nested.view, "account");
        assert_eq!(nested.context.depth(), 2);

        let root = context_at("/settings");
        let matched = outer.resolve(&root).unwrap();
        assert_eq!(*inner.resolve(&matched.context).unwrap().view, "index");
    }
}
