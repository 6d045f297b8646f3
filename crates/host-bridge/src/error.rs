//! Host bridge errors

use crosswing_router::RouterError;
use thiserror::Error;

/// Host bridge errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A channel already has its one subscriber
    #[error("Channel {channel} already has a subscriber")]
    AlreadyRegistered {
        /// Channel name
        channel: &'static str,
    },

    /// `HostBridge::init` was called twice without a teardown
    #[error("Host bridge already initialized")]
    AlreadyInitialized,

    /// `HostBridge::get` was called before `init`
    #[error("Host bridge not initialized")]
    NotInitialized,

    /// The host sent a link the router cannot use
    #[error("Invalid deep link {url:?}: {reason}")]
    InvalidDeepLink {
        /// The link as received
        url: String,
        /// What was wrong with it
        reason: String,
    },

    /// Navigation triggered by the host failed
    #[error("Router error: {0}")]
    Router(#[from] RouterError),
}

/// Result type for host bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
