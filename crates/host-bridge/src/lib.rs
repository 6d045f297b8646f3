//! Host bridge for Crosswing application shells
//!
//! Native shells (mobile webviews, desktop wrappers) push events into the
//! app: deep links to open and viewport geometry. Each event kind goes to a
//! single consumer registered on the process-wide [`HostBridge`].
//!
//! # Example
//!
//! ```rust
//! use crosswing_host_bridge::{HostBridge, HostBridgeConfig};
//! use crosswing_router::{History, Router};
//!
//! let router = Router::memory("/").unwrap();
//! let bridge = HostBridge::new(HostBridgeConfig::default());
//! let _registration = bridge.route_deep_links(router.context()).unwrap();
//!
//! bridge.open_deep_link("https://example.com/items/42").unwrap();
//! assert_eq!(router.history().top().href(), "/items/42");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod error;
pub mod registry;

pub use bridge::{
    DeepLink, HostBridge, HostBridgeConfig, HostMessage, SafeAreaInsets, ViewportChange,
    DEEP_LINK_CHANNEL, VIEWPORT_CHANNEL,
};
pub use error::{BridgeError, Result};
pub use registry::{Handler, Registration, SingleSubscriber};
