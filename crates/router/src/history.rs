//! History implementations
//!
//! A [`History`] owns the current [`RouterLocation`] and tells listeners when
//! it changes. Two variants are provided:
//!
//! - [`MemoryHistory`] - in-process, for tests, previews and headless shells
//! - [`BrowserHistory`] - mirrors a native history stack through the
//!   [`NativeHistory`] seam and reacts to external pop-state events
//!
//! Notification is synchronous. The location is stored before any listener
//! runs, and listeners are invoked from a snapshot taken when notification
//! starts, so a listener may navigate, subscribe or unsubscribe without
//! disturbing the pass in flight.

use crate::error::{Result, RouterError};
use crate::location::RouterLocation;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

// =============================================================================
// Navigation events
// =============================================================================

/// Options for [`History::navigate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl NavigateOptions {
    /// Options for a replacing navigation
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// How the location changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// A new entry was pushed
    Push,
    /// The current entry was replaced
    Replace,
    /// The host moved through its own stack (back/forward)
    Pop,
}

impl From<NavigateOptions> for NavigationAction {
    fn from(options: NavigateOptions) -> Self {
        if options.replace {
            NavigationAction::Replace
        } else {
            NavigationAction::Push
        }
    }
}

/// Delivered to every listener after a navigation
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
    /// The new current location
    pub location: RouterLocation,
    /// What kind of navigation produced it
    pub action: NavigationAction,
}

/// Listener callback
pub type Listener = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

// =============================================================================
// Listener registry
// =============================================================================

/// Ordered set of listeners shared by both history variants
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, listener));
        Unsubscribe {
            registry: Arc::downgrade(self),
            id,
        }
    }

    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn notify(&self, event: &NavigationEvent) {
        // Lock is released before any listener runs
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().len()
    }
}

/// Handle returned by [`History::listen`]
///
/// Dropping it leaves the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug, Clone)]
#[must_use = "keep the handle if the listener ever needs removing"]
pub struct Unsubscribe {
    registry: Weak<ListenerRegistry>,
    id: u64,
}

impl Unsubscribe {
    /// Remove the listener. Returns false if it was already removed.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(self.id),
            None => false,
        }
    }
}

// =============================================================================
// History trait
// =============================================================================

/// Single source of truth for the current location
pub trait History: Send + Sync {
    /// Current location, without side effects
    fn top(&self) -> RouterLocation;

    /// Navigate to an absolute path
    ///
    /// Fails with [`RouterError::InvalidNavigation`] when `to` is relative.
    fn navigate(&self, to: &str, options: NavigateOptions) -> Result<()>;

    /// Register a listener for location changes
    fn listen(&self, listener: Listener) -> Unsubscribe;
}

/// Validate and parse a navigation target
fn parse_target(to: &str) -> Result<RouterLocation> {
    if !to.starts_with('/') {
        return Err(RouterError::InvalidNavigation { to: to.to_string() });
    }
    RouterLocation::from_href(to)
}

// =============================================================================
// MemoryHistory
// =============================================================================

/// In-process history
pub struct MemoryHistory {
    location: RwLock<RouterLocation>,
    listeners: Arc<ListenerRegistry>,
}

impl MemoryHistory {
    /// Create a memory history starting at `initial`
    pub fn new(initial: &str) -> Result<Self> {
        Ok(Self::at(RouterLocation::from_href(initial)?))
    }

    /// Create a memory history starting at an already parsed location
    pub fn at(location: RouterLocation) -> Self {
        Self {
            location: RwLock::new(location),
            listeners: Arc::new(ListenerRegistry::default()),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::at(RouterLocation::root())
    }
}

impl History for MemoryHistory {
    fn top(&self) -> RouterLocation {
        self.location.read().clone()
    }

    fn navigate(&self, to: &str, options: NavigateOptions) -> Result<()> {
        let location = parse_target(to)?;
        tracing::debug!(href = %location, replace = options.replace, "memory navigate");

        *self.location.write() = location.clone();
        self.listeners.notify(&NavigationEvent {
            location,
            action: options.into(),
        });
        Ok(())
    }

    fn listen(&self, listener: Listener) -> Unsubscribe {
        self.listeners.add(listener)
    }
}

// =============================================================================
// BrowserHistory
// =============================================================================

/// Native history stack of the host (a browser window or webview)
#[cfg_attr(test, mockall::automock)]
pub trait NativeHistory: Send + Sync {
    /// Current path + query as the host reports it
    fn current_href(&self) -> String;
    /// Push a new entry
    fn push_state(&self, href: &str);
    /// Replace the current entry
    fn replace_state(&self, href: &str);
    /// Step back; the host reports the result through a pop-state event
    fn back(&self);
}

/// History backed by the host's native stack
pub struct BrowserHistory<N: NativeHistory> {
    native: N,
    location: RwLock<RouterLocation>,
    listeners: Arc<ListenerRegistry>,
}

impl<N: NativeHistory> BrowserHistory<N> {
    /// Wrap a native history, reading its current location
    pub fn new(native: N) -> Result<Self> {
        let location = RouterLocation::from_href(&native.current_href())?;
        Ok(Self {
            native,
            location: RwLock::new(location),
            listeners: Arc::new(ListenerRegistry::default()),
        })
    }

    /// Handle a pop-state event from the host
    ///
    /// Re-reads the native location and notifies listeners with
    /// [`NavigationAction::Pop`].
    pub fn handle_pop_state(&self) -> Result<()> {
        let href = self.native.current_href();
        let location = RouterLocation::from_href(&href).inspect_err(|e| {
            tracing::warn!("Ignoring pop-state to unparseable location: {}", e);
        })?;
        tracing::debug!(href = %location, "browser pop-state");

        *self.location.write() = location.clone();
        self.listeners.notify(&NavigationEvent {
            location,
            action: NavigationAction::Pop,
        });
        Ok(())
    }

    /// Ask the host to go back one entry
    pub fn back(&self) {
        self.native.back();
    }

    /// The wrapped native history
    pub fn native(&self) -> &N {
        &self.native
    }
}

impl<N: NativeHistory> History for BrowserHistory<N> {
    fn top(&self) -> RouterLocation {
        self.location.read().clone()
    }

    fn navigate(&self, to: &str, options: NavigateOptions) -> Result<()> {
        let location = parse_target(to)?;
        let href = location.href();
        tracing::debug!(href = %href, replace = options.replace, "browser navigate");

        if options.replace {
            self.native.replace_state(&href);
        } else {
            self.native.push_state(&href);
        }

        *self.location.write() = location.clone();
        self.listeners.notify(&NavigationEvent {
            location,
            action: options.into(),
        });
        Ok(())
    }

    fn listen(&self, listener: Listener) -> Unsubscribe {
        self.listeners.add(listener)
    }
}
