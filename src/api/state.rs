//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the agency configuration, loaded once at startup and read by every
/// request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_config() {
        let state = AppState::new(ConfigLoader::load("./config/default").unwrap());
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
    }
}
