//! Host bridge
//!
//! The native shell embedding a Crosswing app talks to it through one
//! [`HostBridge`]: it reports deep links and viewport changes, and the app
//! installs exactly one consumer for each. The process-wide instance is set
//! up with [`HostBridge::init`] and removed with [`HostBridge::teardown`].

use crate::error::{BridgeError, Result};
use crate::registry::{Registration, SingleSubscriber};
use crosswing_router::{NavigateOptions, RouterHandle, RouterLocation};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static INSTANCE: Mutex<Option<Arc<HostBridge>>> = parking_lot::const_mutex(None);

/// Channel name for deep links
pub const DEEP_LINK_CHANNEL: &str = "deepLink";
/// Channel name for viewport changes
pub const VIEWPORT_CHANNEL: &str = "viewportChange";

// =============================================================================
// Configuration
// =============================================================================

/// Host bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostBridgeConfig {
    /// URL schemes accepted for deep links; empty accepts any
    pub allowed_schemes: Vec<String>,

    /// Deep-link navigations replace the current entry instead of pushing
    pub replace_on_deep_link: bool,
}

// =============================================================================
// Events
// =============================================================================

/// A link the host asked the app to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    /// The link as received
    pub url: String,
    /// Where it points inside the app
    pub location: RouterLocation,
}

impl DeepLink {
    /// Parse a deep link
    ///
    /// Accepts bare absolute paths (`/items/42`), web URLs
    /// (`https://example.com/items/42`, authority dropped) and custom-scheme
    /// URLs (`myapp://items/42`, everything after `://` is the path).
    /// Fragments are dropped.
    pub fn parse(url: &str, allowed_schemes: &[String]) -> Result<Self> {
        let invalid = |reason: &str| BridgeError::InvalidDeepLink {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let without_fragment = url.split('#').next().unwrap_or_default();

        let href = if without_fragment.starts_with('/') {
            without_fragment.to_string()
        } else if let Some((scheme, rest)) = without_fragment.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            if !allowed_schemes.is_empty()
                && !allowed_schemes.iter().any(|s| s.eq_ignore_ascii_case(&scheme))
            {
                return Err(invalid("scheme not allowed"));
            }
            let path = if scheme == "http" || scheme == "https" {
                match rest.find(['/', '?']) {
                    Some(idx) => &rest[idx..],
                    None => "",
                }
            } else {
                rest
            };
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            return Err(invalid("expected an absolute path or a URL"));
        };

        let location = RouterLocation::from_href(&href).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            location,
        })
    }
}

/// Safe-area insets in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeAreaInsets {
    /// Top inset
    pub top: f64,
    /// Right inset
    pub right: f64,
    /// Bottom inset
    pub bottom: f64,
    /// Left inset
    pub left: f64,
}

/// Viewport geometry reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportChange {
    /// Viewport width
    pub width: f64,
    /// Viewport height
    pub height: f64,
    /// Safe-area insets
    pub safe_area: SafeAreaInsets,
    /// Height of the on-screen keyboard, zero when hidden
    pub keyboard_height: f64,
}

/// Message envelope as sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Open a deep link
    DeepLink {
        /// The link
        url: String,
    },
    /// The viewport changed
    ViewportChange(ViewportChange),
}

// =============================================================================
// HostBridge
// =============================================================================

/// Registry of host event consumers
#[derive(Debug)]
pub struct HostBridge {
    config: HostBridgeConfig,
    deep_links: SingleSubscriber<DeepLink>,
    viewport: SingleSubscriber<ViewportChange>,
    last_viewport: Mutex<Option<ViewportChange>>,
}

impl HostBridge {
    /// Create a standalone bridge (not installed process-wide)
    pub fn new(config: HostBridgeConfig) -> Self {
        Self {
            config,
            deep_links: SingleSubscriber::new(DEEP_LINK_CHANNEL),
            viewport: SingleSubscriber::new(VIEWPORT_CHANNEL),
            last_viewport: Mutex::new(None),
        }
    }

    /// Install the process-wide bridge
    pub fn init(config: HostBridgeConfig) -> Result<Arc<HostBridge>> {
        let mut instance = INSTANCE.lock();
        if instance.is_some() {
            return Err(BridgeError::AlreadyInitialized);
        }
        let bridge = Arc::new(HostBridge::new(config));
        *instance = Some(bridge.clone());
        tracing::info!("Host bridge initialized");
        Ok(bridge)
    }

    /// The process-wide bridge
    pub fn get() -> Result<Arc<HostBridge>> {
        INSTANCE.lock().clone().ok_or(BridgeError::NotInitialized)
    }

    /// Remove the process-wide bridge and its subscribers
    ///
    /// Returns false if there was nothing to tear down.
    pub fn teardown() -> bool {
        match INSTANCE.lock().take() {
            Some(bridge) => {
                bridge.deep_links.clear();
                bridge.viewport.clear();
                tracing::info!("Host bridge torn down");
                true
            }
            None => false,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &HostBridgeConfig {
        &self.config
    }

    /// Deep-link channel
    pub fn deep_links(&self) -> &SingleSubscriber<DeepLink> {
        &self.deep_links
    }

    /// Viewport channel
    pub fn viewport(&self) -> &SingleSubscriber<ViewportChange> {
        &self.viewport
    }

    /// Host entry point: open a link
    pub fn open_deep_link(&self, url: &str) -> Result<bool> {
        let link = DeepLink::parse(url, &self.config.allowed_schemes)?;
        tracing::debug!(url, href = %link.location, "deep link");
        Ok(self.deep_links.dispatch(&link))
    }

    /// Host entry point: the viewport changed
    pub fn viewport_changed(&self, change: ViewportChange) -> bool {
        *self.last_viewport.lock() = Some(change);
        self.viewport.dispatch(&change)
    }

    /// Most recent viewport reported by the host
    pub fn last_viewport(&self) -> Option<ViewportChange> {
        *self.last_viewport.lock()
    }

    /// Host entry point for enveloped messages
    pub fn handle_message(&self, message: HostMessage) -> Result<bool> {
        match message {
            HostMessage::DeepLink { url } => self.open_deep_link(&url),
            HostMessage::ViewportChange(change) => Ok(self.viewport_changed(change)),
        }
    }

    /// Route deep links into the app through `handle`
    pub fn route_deep_links<H>(&self, handle: H) -> Result<Registration>
    where
        H: RouterHandle + Send + Sync + 'static,
    {
        let options = NavigateOptions {
            replace: self.config.replace_on_deep_link,
        };
        self.deep_links.register(move |link: &DeepLink| {
            if let Err(e) = handle.navigate(&link.location.href(), options) {
                tracing::warn!("Deep link {} could not be opened: {}", link.url, e);
            }
        })
    }
}
