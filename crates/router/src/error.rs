//! Router errors

use thiserror::Error;

/// Errors raised while parsing locations or navigating
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Malformed href, or a relative href where an absolute one is required
    #[error("Invalid path {href:?}: {reason}")]
    InvalidPath {
        /// The offending href
        href: String,
        /// What was wrong with it
        reason: String,
    },

    /// A relative path was handed to `History::navigate`
    #[error("Cannot navigate to relative path {to:?}; resolve it with link_to first")]
    InvalidNavigation {
        /// The offending target
        to: String,
    },

    /// Configuration value the router cannot use
    #[error("Invalid router config: {0}")]
    InvalidConfig(String),
}

impl RouterError {
    pub(crate) fn invalid_path(href: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidPath {
            href: href.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for router operations
pub type Result<T> = std::result::Result<T, RouterError>;
