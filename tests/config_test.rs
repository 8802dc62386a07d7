//! Shipped configuration file

use std::path::PathBuf;

use onboarding_core::config::ConfigManager;
use onboarding_core::gateway::HttpGateway;
use onboarding_core::workflow::NavigationMode;

fn config_dir() -> Option<PathBuf> {
    Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config"))
}

#[test]
fn test_shipped_config_is_valid_for_every_environment() {
    for environment in ["development", "test", "production"] {
        let manager = ConfigManager::load_from_directory_with_env(config_dir(), environment)
            .unwrap_or_else(|e| panic!("{environment}: {e}"));
        assert_eq!(manager.environment(), environment);
        assert!(HttpGateway::new(&manager.config().gateway).is_ok());
    }
}

#[test]
fn test_production_uses_sequential_navigation() {
    let manager = ConfigManager::load_from_directory_with_env(config_dir(), "production").unwrap();
    let config = manager.config();

    assert_eq!(config.navigation.mode, NavigationMode::Sequential);
    assert_eq!(config.gateway.timeout_ms, 15_000);
    assert_eq!(config.overrides.max_reentrant_passes, 5);
}

#[test]
fn test_development_keeps_base_values() {
    let manager = ConfigManager::load_from_directory_with_env(config_dir(), "development").unwrap();
    assert_eq!(manager.config().navigation.mode, NavigationMode::Free);
    assert_eq!(manager.config().gateway.base_url, "http://localhost:8080/api");
}
