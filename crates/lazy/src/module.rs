//! Lazy modules
//!
//! A [`LazyModule`] wraps an asynchronous [`ModuleLoader`] and exposes where
//! it is in its life as a plain [`LoadState`] value that render code can
//! match on without awaiting anything. Loading is single flight: concurrent
//! callers of [`LazyModule::load`] share one invocation of the loader.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Error type loaders may return
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Load errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The loader returned an error
    #[error("Module {module} failed to load: {reason}")]
    Failed {
        /// Module name
        module: String,
        /// Loader error message
        reason: String,
    },

    /// The loader did not finish in time
    #[error("Module {module} timed out after {timeout:?}")]
    Timeout {
        /// Module name
        module: String,
        /// Configured timeout
        timeout: Duration,
    },
}

/// Result type for load operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Produces a module asynchronously
#[async_trait]
pub trait ModuleLoader<M: Send + 'static>: Send + Sync {
    /// Load the module
    async fn load(&self) -> std::result::Result<M, BoxError>;
}

/// [`ModuleLoader`] backed by an async closure
pub struct FnLoader<F>(pub F);

#[async_trait]
impl<M, F, Fut> ModuleLoader<M> for FnLoader<F>
where
    M: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<M, BoxError>> + Send + 'static,
{
    async fn load(&self) -> std::result::Result<M, BoxError> {
        (self.0)().await
    }
}

/// Where a lazy module is in its life
#[derive(Debug)]
pub enum LoadState<M> {
    /// Never requested
    Idle,
    /// A load is in flight
    Loading,
    /// Loaded and ready to render
    Ready(Arc<M>),
    /// The last load failed; call [`LazyModule::reset`] to allow a retry
    Failed(LoadError),
}

impl<M> Clone for LoadState<M> {
    fn clone(&self) -> Self {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(module) => LoadState::Ready(module.clone()),
            LoadState::Failed(e) => LoadState::Failed(e.clone()),
        }
    }
}

impl<M> LoadState<M> {
    /// Check if the module is ready
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

/// Lazy module configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LazyConfig {
    /// Give up on a load after this many milliseconds
    pub timeout_ms: Option<u64>,
}

impl LazyConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// A module loaded on first use
pub struct LazyModule<M: Send + 'static> {
    name: String,
    loader: Arc<dyn ModuleLoader<M>>,
    config: LazyConfig,
    state: RwLock<LoadState<M>>,
    gate: Mutex<()>,
}

impl<M: Send + Sync + 'static> LazyModule<M> {
    /// Create a lazy module around `loader`
    pub fn new(name: impl Into<String>, loader: impl ModuleLoader<M> + 'static, config: LazyConfig) -> Self {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
            config,
            state: RwLock::new(LoadState::Idle),
            gate: Mutex::new(()),
        }
    }

    /// Create a lazy module around an async closure
    pub fn from_fn<F, Fut>(name: impl Into<String>, f: F, config: LazyConfig) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<M, BoxError>> + Send + 'static,
    {
        Self::new(name, FnLoader(f), config)
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state
    pub fn state(&self) -> LoadState<M> {
        self.state.read().clone()
    }

    /// The module, if loaded
    pub fn get(&self) -> Option<Arc<M>> {
        match &*self.state.read() {
            LoadState::Ready(module) => Some(module.clone()),
            _ => None,
        }
    }

    /// Load the module, or return it if already loaded
    ///
    /// A failed load stays failed until [`reset`](Self::reset) is called.
    pub async fn load(&self) -> Result<Arc<M>> {
        if let Some(settled) = self.settled() {
            return settled;
        }

        let _gate = self.gate.lock().await;
        // Another caller may have finished while we waited
        if let Some(settled) = self.settled() {
            return settled;
        }

        self.set_state(LoadState::Loading);
        tracing::debug!(module = %self.name, "loading module");

        let outcome = match self.config.timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, self.loader.load()).await {
                Ok(result) => result.map_err(|e| self.failed(e)),
                Err(_) => Err(LoadError::Timeout {
                    module: self.name.clone(),
                    timeout,
                }),
            },
            None => self.loader.load().await.map_err(|e| self.failed(e)),
        };

        match outcome {
            Ok(module) => {
                let module = Arc::new(module);
                self.set_state(LoadState::Ready(module.clone()));
                tracing::debug!(module = %self.name, "module ready");
                Ok(module)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.set_state(LoadState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Clear a failure so the next [`load`](Self::load) retries
    ///
    /// Returns false unless the module was in the failed state.
    pub fn reset(&self) -> bool {
        let mut state = self.state.write();
        if matches!(*state, LoadState::Failed(_)) {
            *state = LoadState::Idle;
            true
        } else {
            false
        }
    }

    fn settled(&self) -> Option<Result<Arc<M>>> {
        match &*self.state.read() {
            LoadState::Ready(module) => Some(Ok(module.clone())),
            LoadState::Failed(e) => Some(Err(e.clone())),
            LoadState::Idle | LoadState::Loading => None,
        }
    }

    fn set_state(&self, state: LoadState<M>) {
        *self.state.write() = state;
    }

    fn failed(&self, error: BoxError) -> LoadError {
        LoadError::Failed {
            module: self.name.clone(),
            reason: error.to_string(),
        }
    }
}

impl<M: Send + 'static> fmt::Debug for LazyModule<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.read() {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "failed",
        };
        f.debug_struct("LazyModule")
            .field("name", &self.name)
            .field("state", &state)
            .finish()
    }
}
