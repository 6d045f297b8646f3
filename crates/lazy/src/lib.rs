//! Lazy module loading for Crosswing application shells
//!
//! Screens that are expensive to set up are wrapped in a [`LazyModule`] and
//! loaded the first time a route needs them. Render code matches on
//! [`LoadState`] to show a placeholder, an error, or the loaded module.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod module;

pub use module::{BoxError, FnLoader, LazyConfig, LazyModule, LoadError, LoadState, ModuleLoader};
