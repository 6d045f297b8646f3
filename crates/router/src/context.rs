//! Router context
//!
//! A [`RouterContext`] is the `{location, history, parent, flags}` value
//! handed down to whatever renders below a router boundary. Contexts are
//! passed explicitly; a matcher that claims part of the path produces a
//! nested context with [`RouterContext::nest`]. Navigation from any level
//! resolves relative paths against that level's claimed prefix and then
//! goes to the one root [`History`].

use crate::error::Result;
use crate::history::{History, MemoryHistory, NavigateOptions};
use crate::location::RouterLocation;
use crate::pattern::RouteMatch;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static DEFAULT_CONTEXT_WARNED: AtomicBool = AtomicBool::new(false);

/// Capability handed to code that needs to read or change the location
pub trait RouterHandle {
    /// Location as seen from this handle
    fn location(&self) -> RouterLocation;

    /// Navigate, resolving relative paths from this handle's position
    fn navigate(&self, path: &str, options: NavigateOptions) -> Result<()>;
}

/// Flags describing how a context was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterFlags {
    /// No router was provided; this context is a stand-in
    pub is_default: bool,
}

/// Read-only snapshot of the router state at one level of the tree
#[derive(Clone)]
pub struct RouterContext {
    location: RouterLocation,
    history: Arc<dyn History>,
    parent: Option<Arc<RouterContext>>,
    flags: RouterFlags,
}

impl RouterContext {
    /// Root context for `history` at its current location
    pub fn root(history: Arc<dyn History>) -> Self {
        Self::at(history.top(), history)
    }

    /// Root context for `history` showing `location`
    pub(crate) fn at(location: RouterLocation, history: Arc<dyn History>) -> Self {
        Self {
            location,
            history,
            parent: None,
            flags: RouterFlags::default(),
        }
    }

    /// Use `context` if present, otherwise a default one
    ///
    /// The default context sits on a fresh in-memory history at `/`. The
    /// first time this happens in a process a warning is logged.
    pub fn or_default(context: Option<&RouterContext>) -> RouterContext {
        match context {
            Some(context) => context.clone(),
            None => {
                if !DEFAULT_CONTEXT_WARNED.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        "No router context provided; falling back to a default in-memory router"
                    );
                }
                Self::default_context()
            }
        }
    }

    fn default_context() -> RouterContext {
        let mut context = Self::root(Arc::new(MemoryHistory::default()));
        context.flags.is_default = true;
        context
    }

    /// Child context for whatever is mounted below `route_match`
    pub fn nest(&self, route_match: &RouteMatch) -> RouterContext {
        Self {
            location: route_match.child_location(),
            history: self.history.clone(),
            parent: Some(Arc::new(self.clone())),
            flags: self.flags,
        }
    }

    /// Location at this level; its claimed prefix is this level's mount point
    pub fn location(&self) -> &RouterLocation {
        &self.location
    }

    /// The root history
    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Enclosing context, if this one is nested
    pub fn parent(&self) -> Option<&RouterContext> {
        self.parent.as_deref()
    }

    /// Nesting depth, zero at the root
    pub fn depth(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.depth() + 1)
    }

    /// Flags for this context
    pub fn flags(&self) -> RouterFlags {
        self.flags
    }

    /// Check if this is a stand-in context
    pub fn is_default(&self) -> bool {
        self.flags.is_default
    }

    /// Resolve `relative` from this level, see [`RouterLocation::link_to`]
    pub fn link_to(&self, relative: &str) -> Result<String> {
        self.location.link_to(relative)
    }

    /// Navigate from this level
    pub fn navigate(&self, to: &str, options: NavigateOptions) -> Result<()> {
        let href = self.location.link_to(to)?;
        self.history.navigate(&href, options)
    }
}

impl RouterHandle for RouterContext {
    fn location(&self) -> RouterLocation {
        self.location.clone()
    }

    fn navigate(&self, path: &str, options: NavigateOptions) -> Result<()> {
        RouterContext::navigate(self, path, options)
    }
}

impl fmt::Debug for RouterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterContext")
            .field("location", &self.location.href())
            .field("claimed", &self.location.claimed_path())
            .field("depth", &self.depth())
            .field("flags", &self.flags)
            .finish()
    }
}
