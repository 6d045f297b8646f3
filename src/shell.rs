//! Application shell
//!
//! Wires a [`Router`] and a [`HostBridge`] together from one
//! [`ShellConfig`]: deep links reported by the host navigate the router.
//!
//! [`Shell::new`] and [`Shell::with_history`] install the process-wide
//! bridge with [`HostBridge::init`], so native code reaches the shell through
//! [`HostBridge::get`]. Only one such shell can run at a time; shutting it
//! down tears the bridge down again. [`Shell::with_bridge`] takes an injected
//! bridge instead and leaves the process-wide slot alone.

use crate::config::{ConfigError, ShellConfig};
use crate::logging;
use crosswing_host_bridge::{BridgeError, HostBridge, Registration};
use crosswing_lazy::{BoxError, LazyModule};
use crosswing_router::{History, Router, RouterError};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Shell startup errors
#[derive(Debug, Error)]
pub enum ShellError {
    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Router could not be built
    #[error(transparent)]
    Router(#[from] RouterError),

    /// Host bridge wiring failed
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// A running application shell
pub struct Shell {
    config: ShellConfig,
    router: Router,
    bridge: Arc<HostBridge>,
    process_wide: bool,
    deep_links: Option<Registration>,
}

impl Shell {
    /// Start a shell on an in-memory history at `router.initialPath`
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        Self::prepare(&config)?;
        let router = Router::from_config(config.router.clone())?;
        Self::assemble_process_wide(config, router)
    }

    /// Start a shell on an injected history (a browser history in real apps)
    pub fn with_history(config: ShellConfig, history: Arc<dyn History>) -> Result<Self, ShellError> {
        Self::prepare(&config)?;
        let router = Router::with_config(history, config.router.clone());
        Self::assemble_process_wide(config, router)
    }

    /// Start a shell on an injected history and bridge
    ///
    /// The bridge is used as given; the process-wide instance is neither
    /// installed nor torn down.
    pub fn with_bridge(
        config: ShellConfig,
        history: Arc<dyn History>,
        bridge: Arc<HostBridge>,
    ) -> Result<Self, ShellError> {
        Self::prepare(&config)?;
        let router = Router::with_config(history, config.router.clone());
        Self::assemble(config, router, bridge, false)
    }

    fn prepare(config: &ShellConfig) -> Result<(), ShellError> {
        config.validate()?;
        if !logging::init(&config.log_filter) {
            tracing::debug!("Subscriber already installed; logFilter not applied");
        }
        Ok(())
    }

    fn assemble_process_wide(config: ShellConfig, router: Router) -> Result<Self, ShellError> {
        let bridge = HostBridge::init(config.host_bridge.clone())?;
        Self::assemble(config, router, bridge, true).inspect_err(|_| {
            HostBridge::teardown();
        })
    }

    fn assemble(
        config: ShellConfig,
        router: Router,
        bridge: Arc<HostBridge>,
        process_wide: bool,
    ) -> Result<Self, ShellError> {
        let deep_links = bridge.route_deep_links(router.context())?;
        tracing::info!(location = %router.context().location(), process_wide, "Shell started");
        Ok(Self {
            config,
            router,
            bridge,
            process_wide,
            deep_links: Some(deep_links),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// The router
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The host bridge
    pub fn bridge(&self) -> &Arc<HostBridge> {
        &self.bridge
    }

    /// Check if this shell owns the process-wide bridge
    pub fn is_process_wide(&self) -> bool {
        self.process_wide
    }

    /// A lazy module using the shell's loader defaults
    pub fn lazy_module<M, F, Fut>(&self, name: &str, f: F) -> LazyModule<M>
    where
        M: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M, BoxError>> + Send + 'static,
    {
        LazyModule::from_fn(name, f, self.config.lazy)
    }

    /// Stop routing deep links and release the process-wide bridge
    pub fn shutdown(&mut self) {
        let Some(registration) = self.deep_links.take() else {
            return;
        };
        self.bridge.deep_links().unregister(registration);

        // Leave a bridge someone else installed in the meantime alone
        if self.process_wide
            && HostBridge::get().is_ok_and(|current| Arc::ptr_eq(&current, &self.bridge))
        {
            HostBridge::teardown();
        }
        tracing::info!("Shell stopped");
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.shutdown();
    }
}
