//! Client router for Crosswing application shells
//!
//! This crate provides the routing core shared by Crosswing products:
//! locations, histories, router contexts and the route matchers built on
//! top of them.
//!
//! # Modules
//!
//! - [`location`] - Parsed, immutable path + query values
//! - [`history`] - Memory and browser-backed histories with listeners
//! - [`context`] - Router contexts passed down the view tree
//! - [`pattern`] - Route patterns and matches
//! - [`switch`] - First-match route selection
//! - [`navs`] - Stack navigation
//! - [`tabs`] - Tab navigation with per-tab location memory
//! - [`router`] - Router root where the history is injected
//! - [`config`] - Router configuration
//!
//! # Example
//!
//! ```rust
//! use crosswing_router::{History, NavigateOptions, Router, Switch};
//!
//! let router = Router::memory("/home").unwrap();
//! let switch = Switch::new()
//!     .route("home", "home screen")
//!     .route("items/:id", "item screen");
//!
//! router.navigate("/items/42", NavigateOptions::default()).unwrap();
//! let matched = switch.resolve(&router.context()).unwrap();
//! assert_eq!(*matched.view, "item screen");
//! assert_eq!(matched.route_match.param("id"), Some("42"));
//! assert_eq!(router.history().top().href(), "/items/42");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod location;
pub mod navs;
pub mod pattern;
pub mod router;
pub mod switch;
pub mod tabs;

// Re-export commonly used types
pub use config::RouterConfig;
pub use context::{RouterContext, RouterFlags, RouterHandle};
pub use error::{Result, RouterError};
pub use history::{
    BrowserHistory, History, Listener, MemoryHistory, NativeHistory, NavigateOptions,
    NavigationAction, NavigationEvent, Unsubscribe,
};
pub use location::{Query, RouterLocation};
pub use navs::{NavRoute, Navs, NavsConfig, NavsTransition, StackEntry, ViewBuilder};
pub use pattern::{RouteMatch, RouteParams, RoutePattern};
pub use router::Router;
pub use switch::{Matched, Switch, SwitchRoute};
pub use tabs::{Tab, Tabs, TabsConfig, TabsMemory, TabsUpdate};
