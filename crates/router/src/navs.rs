//! Stack navigation
//!
//! [`Navs`] matches the unclaimed path like a [`Switch`](crate::Switch) but
//! also keeps a stack of everything visited below its mount point, so that
//! going back restores the previous screen as it was instead of building it
//! again.
//!
//! Stack rules, applied on every [`Navs::update`]:
//! - no route matches: nothing is current, the stack is left alone
//! - same resolved path as the top entry: the entry is refreshed in place,
//!   or rebuilt when a different route produced the path
//! - same resolved path as an earlier entry: pop back to it
//! - a replacing navigation: the top entry is swapped out
//! - anything else: build the view and push it
//!
//! The resolved path of an entry is the path its pattern consumed, so two
//! adjacent entries never share one.

use crate::context::{RouterContext, RouterHandle};
use crate::error::Result;
use crate::history::{NavigateOptions, NavigationAction};
use crate::pattern::{RouteMatch, RoutePattern};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Builds the view for a matched route
pub type ViewBuilder<V> = Box<dyn Fn(&RouteMatch) -> V + Send + Sync>;

/// Configuration for a [`Navs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavsConfig {
    /// Maximum number of stack entries; oldest entries are evicted first
    pub max_depth: Option<usize>,
}

/// How the stack changed on the last update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavsTransition {
    /// A new entry was pushed (slide in)
    Push,
    /// Entries were popped back to an earlier one (slide out)
    Pop {
        /// How many entries were removed
        count: usize,
    },
    /// The top entry was swapped for a new one
    Replace,
    /// The top entry stayed; only its match was refreshed
    None,
    /// Nothing matched
    NotFound,
}

/// A route inside a [`Navs`]
pub struct NavRoute<V> {
    pattern: RoutePattern,
    builder: ViewBuilder<V>,
}

impl<V> fmt::Debug for NavRoute<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavRoute")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A navigation stack entry
#[derive(Debug, Clone)]
pub struct StackEntry<V> {
    /// Unique key for this entry
    pub key: String,
    /// Resolved path the entry's pattern consumed
    pub path: String,
    /// Index of the route that produced this entry
    pub route_index: usize,
    /// Latest match for this entry
    pub route_match: RouteMatch,
    /// The built view
    pub view: V,
}

impl<V> StackEntry<V> {
    fn new(route_index: usize, route_match: RouteMatch, view: V) -> Self {
        Self {
            key: uuid::Uuid::new_v4().to_string(),
            path: route_match.matched_path(),
            route_index,
            route_match,
            view,
        }
    }

    /// Full href this entry was last showing
    pub fn href(&self) -> String {
        self.route_match.location.href()
    }
}

/// Stack navigator
pub struct Navs<V> {
    routes: Vec<NavRoute<V>>,
    entries: Vec<StackEntry<V>>,
    matched: bool,
    config: NavsConfig,
}

impl<V> Default for Navs<V> {
    fn default() -> Self {
        Self::new(NavsConfig::default())
    }
}

impl<V> Navs<V> {
    /// Create an empty navigator
    pub fn new(config: NavsConfig) -> Self {
        Self {
            routes: Vec::new(),
            entries: Vec::new(),
            matched: false,
            config,
        }
    }

    /// Add a route; `builder` runs once per pushed entry
    pub fn route<F>(mut self, pattern: &str, builder: F) -> Self
    where
        F: Fn(&RouteMatch) -> V + Send + Sync + 'static,
    {
        self.routes.push(NavRoute {
            pattern: RoutePattern::parse(pattern),
            builder: Box::new(builder),
        });
        self
    }

    /// Bring the stack in line with `context`
    pub fn update(&mut self, context: &RouterContext, action: NavigationAction) -> NavsTransition {
        let location = context.location();
        let Some((route_index, route_match)) = self
            .routes
            .iter()
            .enumerate()
            .find_map(|(i, route)| route.pattern.matches(location).map(|m| (i, m)))
        else {
            tracing::debug!(href = %location, "navs: no route matched");
            self.matched = false;
            return NavsTransition::NotFound;
        };
        self.matched = true;

        let path = route_match.matched_path();

        if self.entries.last().is_some_and(|top| top.path == path) {
            return self.refresh_top(route_index, route_match);
        }

        if let Some(position) = self.entries.iter().rposition(|e| e.path == path) {
            let count = self.entries.len() - position - 1;
            self.entries.truncate(position + 1);
            self.refresh_top(route_index, route_match);
            tracing::debug!(path = %path, count, "navs: popped");
            return NavsTransition::Pop { count };
        }

        let view = (self.routes[route_index].builder)(&route_match);
        let entry = StackEntry::new(route_index, route_match, view);

        if action == NavigationAction::Replace && !self.entries.is_empty() {
            if let Some(top) = self.entries.last_mut() {
                *top = entry;
            }
            tracing::debug!(path = %path, "navs: replaced");
            return NavsTransition::Replace;
        }

        self.entries.push(entry);
        if let Some(max_depth) = self.config.max_depth {
            let max_depth = max_depth.max(1);
            if self.entries.len() > max_depth {
                let excess = self.entries.len() - max_depth;
                self.entries.drain(..excess);
            }
        }
        tracing::debug!(path = %path, depth = self.entries.len(), "navs: pushed");
        NavsTransition::Push
    }

    /// Point the top entry at `route_match`, rebuilding it if another route
    /// now resolves to the same path
    fn refresh_top(&mut self, route_index: usize, route_match: RouteMatch) -> NavsTransition {
        let Some(top) = self.entries.last_mut() else {
            return NavsTransition::NotFound;
        };
        if top.route_index == route_index {
            top.route_match = route_match;
            return NavsTransition::None;
        }

        let view = (self.routes[route_index].builder)(&route_match);
        *top = StackEntry::new(route_index, route_match, view);
        tracing::debug!(path = %top.path, "navs: route changed in place");
        NavsTransition::Replace
    }

    /// Entry to render, `None` when the location matched nothing
    pub fn current(&self) -> Option<&StackEntry<V>> {
        if self.matched {
            self.entries.last()
        } else {
            None
        }
    }

    /// Context for whatever the current entry mounts below itself
    pub fn current_context(&self, context: &RouterContext) -> Option<RouterContext> {
        self.current().map(|entry| context.nest(&entry.route_match))
    }

    /// Check if there is an entry to go back to
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Href of the entry below the top
    pub fn back_href(&self) -> Option<String> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        Some(self.entries[len - 2].href())
    }

    /// Navigate to the previous entry; returns false at the bottom
    ///
    /// The history entry is replaced rather than pushed, so going back does
    /// not grow a native stack.
    pub fn back(&self, handle: &dyn RouterHandle) -> Result<bool> {
        match self.back_href() {
            Some(href) => {
                handle.navigate(&href, NavigateOptions::replace())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Get all entries (bottom to top)
    pub fn entries(&self) -> &[StackEntry<V>] {
        &self.entries
    }

    /// Drop everything but the bottom entry
    pub fn pop_to_root(&mut self) {
        self.entries.truncate(1);
    }

    /// Configuration in use
    pub fn config(&self) -> NavsConfig {
        self.config
    }
}

impl<V> fmt::Debug for Navs<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navs")
            .field("routes", &self.routes)
            .field(
                "stack",
                &self.entries.iter().map(|e| e.path.as_str()).collect::<Vec<_>>(),
            )
            .field("matched", &self.matched)
            .finish()
    }
}
