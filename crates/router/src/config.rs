//! Router configuration

use crate::error::{Result, RouterError};
use crate::location::RouterLocation;
use crate::navs::NavsConfig;
use crate::tabs::TabsConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`Router`](crate::Router) and the matchers it hands out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterConfig {
    /// Starting location for in-memory routers
    pub initial_path: String,

    /// Defaults for stack navigators
    pub navs: NavsConfig,

    /// Defaults for tab navigators
    pub tabs: TabsConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            initial_path: "/".to_string(),
            navs: NavsConfig::default(),
            tabs: TabsConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Check the configuration for values the router cannot use
    pub fn validate(&self) -> Result<()> {
        RouterLocation::from_href(&self.initial_path)?;
        if self.navs.max_depth == Some(0) {
            return Err(RouterError::InvalidConfig(
                "navs.maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.initial_path, "/");
        assert!(config.tabs.remember_locations);
        assert!(config.navs.max_depth.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"initialPath": "/home", "navs": {"maxDepth": 10}}"#).unwrap();
        assert_eq!(config.initial_path, "/home");
        assert_eq!(config.navs.max_depth, Some(10));
        assert!(config.tabs.remember_locations);
    }

    #[test]
    fn test_validate_rejects_relative_initial_path() {
        let config = RouterConfig {
            initial_path: "home".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = RouterConfig::default();
        config.navs.max_depth = Some(0);
        assert!(config.validate().is_err());
    }
}
