//! Crosswing application shell
//!
//! This crate ties together the Crosswing routing core, the host bridge
//! and lazy module loading, and provides configuration and logging setup
//! for shells built on them.
//!
//! # Crates
//!
//! - [`router`] - Locations, histories, contexts and route matchers
//! - [`host_bridge`] - Host event channels (deep links, viewport)
//! - [`lazy`] - Lazily loaded modules
//!
//! # Example
//!
//! ```rust
//! use crosswing::{Shell, ShellConfig};
//! use crosswing::router::History;
//!
//! let shell = Shell::new(ShellConfig::default()).unwrap();
//! shell.bridge().open_deep_link("myapp://items/42").unwrap();
//! assert_eq!(shell.router().history().top().href(), "/items/42");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;
pub mod shell;

pub use crosswing_host_bridge as host_bridge;
pub use crosswing_lazy as lazy;
pub use crosswing_router as router;

pub use config::{ConfigError, ShellConfig};
pub use shell::{Shell, ShellError};
