//! Tab navigation
//!
//! [`Tabs`] owns a set of tabs, each mounted at its own path prefix below the
//! Tabs' mount point. Every tab remembers the last location visited inside
//! it, so switching away and back lands where the user left off. A tab's
//! view is built the first time the tab becomes active and kept afterwards.

use crate::context::{RouterContext, RouterHandle};
use crate::error::Result;
use crate::history::NavigateOptions;
use crate::location::RouterLocation;
use crate::navs::ViewBuilder;
use crate::pattern::{RouteMatch, RoutePattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Remembered location per tab id
pub type TabsMemory = BTreeMap<String, RouterLocation>;

/// Configuration for a [`Tabs`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabsConfig {
    /// Tab to redirect to from the mount point; first tab when unset
    pub default_tab: Option<String>,
    /// Return to the last location inside a tab when it is selected again
    pub remember_locations: bool,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            default_tab: None,
            remember_locations: true,
        }
    }
}

/// Outcome of [`Tabs::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabsUpdate {
    /// A tab is active
    Active {
        /// Tab id
        tab: String,
        /// The active tab changed with this update
        switched: bool,
    },
    /// The location sits on the mount point; navigate here (replacing)
    Redirect {
        /// Where the default tab lives
        href: String,
    },
    /// No tab claims the location
    NotFound,
}

/// One tab
pub struct Tab<V> {
    id: String,
    path: String,
    pattern: RoutePattern,
    builder: ViewBuilder<V>,
    last_location: Option<RouterLocation>,
    last_match: Option<RouteMatch>,
    view: Option<V>,
}

impl<V> Tab<V> {
    /// Tab identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path prefix relative to the Tabs mount point
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last location visited inside this tab
    pub fn last_location(&self) -> Option<&RouterLocation> {
        self.last_location.as_ref()
    }

    /// The view, once the tab has been visited
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }
}

impl<V> fmt::Debug for Tab<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("last_location", &self.last_location.as_ref().map(|l| l.href()))
            .field("built", &self.view.is_some())
            .finish()
    }
}

/// Tab navigator with per-tab location memory
pub struct Tabs<V> {
    tabs: Vec<Tab<V>>,
    active: Option<usize>,
    mount: Option<RouterLocation>,
    config: TabsConfig,
}

impl<V> Default for Tabs<V> {
    fn default() -> Self {
        Self::new(TabsConfig::default())
    }
}

impl<V> Tabs<V> {
    /// Create an empty tab set
    pub fn new(config: TabsConfig) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            mount: None,
            config,
        }
    }

    /// Add a tab mounted at `path`
    pub fn tab<F>(mut self, id: &str, path: &str, builder: F) -> Self
    where
        F: Fn(&RouteMatch) -> V + Send + Sync + 'static,
    {
        let trimmed = path.trim_matches('/');
        self.tabs.push(Tab {
            id: id.to_string(),
            path: trimmed.to_string(),
            pattern: RoutePattern::parse(&format!("{trimmed}/*")),
            builder: Box::new(builder),
            last_location: None,
            last_match: None,
            view: None,
        });
        self
    }

    /// Bring the active tab in line with `context`
    pub fn update(&mut self, context: &RouterContext) -> TabsUpdate {
        let location = context.location();
        self.mount = Some(location.claim(0));

        let Some((index, route_match)) = self
            .tabs
            .iter()
            .enumerate()
            .find_map(|(i, tab)| tab.pattern.matches(location).map(|m| (i, m)))
        else {
            self.active = None;
            if location.unclaimed_segments().is_empty() {
                // Never redirect to where we already are
                let href = self
                    .default_index()
                    .and_then(|i| self.tab_href_at(i))
                    .filter(|href| *href != location.href());
                if let Some(href) = href {
                    return TabsUpdate::Redirect { href };
                }
            }
            tracing::debug!(href = %location, "tabs: no tab matched");
            return TabsUpdate::NotFound;
        };

        let switched = self.active != Some(index);
        self.active = Some(index);

        let remember = self.config.remember_locations;
        let tab = &mut self.tabs[index];
        if tab.view.is_none() {
            tab.view = Some((tab.builder)(&route_match));
        }
        if remember {
            tab.last_location = Some(location.clone());
        }
        tab.last_match = Some(route_match);

        if switched {
            tracing::debug!(tab = %tab.id, "tabs: switched");
        }
        TabsUpdate::Active {
            tab: tab.id.clone(),
            switched,
        }
    }

    /// Active tab
    pub fn active(&self) -> Option<&Tab<V>> {
        self.tabs.get(self.active?)
    }

    /// Active tab id
    pub fn active_id(&self) -> Option<&str> {
        self.active().map(Tab::id)
    }

    /// Look up a tab
    pub fn get(&self, id: &str) -> Option<&Tab<V>> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// All tabs in declaration order
    pub fn tabs(&self) -> &[Tab<V>] {
        &self.tabs
    }

    /// Where selecting `id` would go
    ///
    /// The remembered location when there is one, the tab root otherwise.
    /// `None` for unknown tabs or before the first update.
    pub fn tab_href(&self, id: &str) -> Option<String> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        self.tab_href_at(index)
    }

    fn tab_href_at(&self, index: usize) -> Option<String> {
        let tab = self.tabs.get(index)?;
        if self.config.remember_locations {
            if let Some(location) = &tab.last_location {
                return Some(location.href());
            }
        }
        self.mount.as_ref()?.link_to(&tab.path).ok()
    }

    fn default_index(&self) -> Option<usize> {
        match &self.config.default_tab {
            Some(id) => self.tabs.iter().position(|t| &t.id == id),
            None if self.tabs.is_empty() => None,
            None => Some(0),
        }
    }

    /// Navigate to tab `id`; returns false for unknown tabs
    pub fn select(&self, id: &str, handle: &dyn RouterHandle) -> Result<bool> {
        match self.tab_href(id) {
            Some(href) => {
                handle.navigate(&href, NavigateOptions::default())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget the remembered location of tab `id`
    pub fn reset_tab(&mut self, id: &str) {
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) {
            tab.last_location = None;
        }
    }

    /// Context for whatever the active tab mounts below itself
    pub fn current_context(&self, context: &RouterContext) -> Option<RouterContext> {
        let route_match = self.active()?.last_match.as_ref()?;
        Some(context.nest(route_match))
    }

    /// Snapshot of every tab's remembered location
    pub fn memory(&self) -> TabsMemory {
        self.tabs
            .iter()
            .filter_map(|t| Some((t.id.clone(), t.last_location.clone()?)))
            .collect()
    }

    /// Restore remembered locations from a snapshot; unknown ids are skipped
    pub fn restore(&mut self, memory: &TabsMemory) {
        for tab in &mut self.tabs {
            if let Some(location) = memory.get(&tab.id) {
                tab.last_location = Some(location.clone());
            }
        }
    }
}

impl<V> fmt::Debug for Tabs<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tabs")
            .field("tabs", &self.tabs)
            .field("active", &self.active_id())
            .field("config", &self.config)
            .finish()
    }
}
