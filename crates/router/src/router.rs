//! Router root
//!
//! The [`Router`] is where a [`History`] gets injected. It hands out root
//! contexts, and navigators preconfigured from its [`RouterConfig`].

use crate::config::RouterConfig;
use crate::context::RouterContext;
use crate::error::Result;
use crate::history::{History, MemoryHistory, NavigateOptions, NavigationAction, NavigationEvent, Unsubscribe};
use crate::navs::Navs;
use crate::tabs::Tabs;
use std::sync::Arc;

/// Root of a routed application
pub struct Router {
    history: Arc<dyn History>,
    config: RouterConfig,
}

impl Router {
    /// Create a router over `history` with the default configuration
    pub fn new(history: Arc<dyn History>) -> Self {
        Self::with_config(history, RouterConfig::default())
    }

    /// Create a router over `history`
    pub fn with_config(history: Arc<dyn History>, config: RouterConfig) -> Self {
        Self { history, config }
    }

    /// In-memory router starting at `initial`
    pub fn memory(initial: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(MemoryHistory::new(initial)?)))
    }

    /// In-memory router built from `config`
    pub fn from_config(config: RouterConfig) -> Result<Self> {
        config.validate()?;
        let history = Arc::new(MemoryHistory::new(&config.initial_path)?);
        Ok(Self::with_config(history, config))
    }

    /// Root context at the current location
    pub fn context(&self) -> RouterContext {
        RouterContext::root(self.history.clone())
    }

    /// The injected history
    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Configuration in use
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Navigate from the root; relative paths resolve against `/`
    pub fn navigate(&self, to: &str, options: NavigateOptions) -> Result<()> {
        self.context().navigate(to, options)
    }

    /// Call `f` with a fresh root context after every navigation
    pub fn on_change<F>(&self, f: F) -> Unsubscribe
    where
        F: Fn(&RouterContext, NavigationAction) + Send + Sync + 'static,
    {
        // Weak so the history does not keep itself alive through its listener
        let history = Arc::downgrade(&self.history);
        self.history.listen(Arc::new(move |event: &NavigationEvent| {
            if let Some(history) = history.upgrade() {
                let context = RouterContext::at(event.location.clone(), history);
                f(&context, event.action);
            }
        }))
    }

    /// Stack navigator using the configured defaults
    pub fn navs<V>(&self) -> Navs<V> {
        Navs::new(self.config.navs)
    }

    /// Tab navigator using the configured defaults
    pub fn tabs<V>(&self) -> Tabs<V> {
        Tabs::new(self.config.tabs.clone())
    }
}
