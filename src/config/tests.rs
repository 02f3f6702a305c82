//! Tests for settings loading.

use super::*;

/// Environment variables are process-global, so the whole lifecycle is
/// exercised in one sequential test to avoid races between parallel tests.
#[test]
fn test_settings_from_env_lifecycle() {
    // Modifying the environment is not thread-safe, hence unsafe blocks.
    unsafe {
        env::remove_var("BINANCE_API_KEY");
        env::remove_var("BINANCE_API_SECRET");
        env::remove_var("BINANCE_FUTURES_TESTNET_URL");
        env::remove_var("DATABASE_PATH");
        env::remove_var("BIND_ADDR");
        env::remove_var("LOG_LEVEL");
    }

    // Missing credentials fail construction.
    let result = Settings::from_env();
    assert!(matches!(result, Err(ConfigError::MissingCredentials)));

    // An empty credential counts as absent.
    unsafe {
        env::set_var("BINANCE_API_KEY", "test_key_123");
        env::set_var("BINANCE_API_SECRET", "");
    }
    assert!(matches!(
        Settings::from_env(),
        Err(ConfigError::MissingCredentials)
    ));

    // With both credentials present, defaults fill the rest.
    unsafe {
        env::set_var("BINANCE_API_SECRET", "test_secret_456");
    }
    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.api_key, "test_key_123");
    assert_eq!(settings.api_secret, "test_secret_456");
    assert_eq!(settings.base_url, "https://testnet.binancefuture.com");
    assert_eq!(settings.database_path, "trading_bot.db");
    assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    assert_eq!(settings.log_level, None);

    // Overrides win over defaults.
    unsafe {
        env::set_var("BINANCE_FUTURES_TESTNET_URL", "http://127.0.0.1:9099");
        env::set_var("DATABASE_PATH", "/tmp/orders-test.db");
        env::set_var("BIND_ADDR", "0.0.0.0:9000");
        env::set_var("LOG_LEVEL", "debug");
    }
    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.base_url, "http://127.0.0.1:9099");
    assert_eq!(settings.database_path, "/tmp/orders-test.db");
    assert_eq!(settings.bind_addr, "0.0.0.0:9000");
    assert_eq!(settings.log_level, Some("debug".to_string()));

    // Cleanup
    unsafe {
        env::remove_var("BINANCE_API_KEY");
        env::remove_var("BINANCE_API_SECRET");
        env::remove_var("BINANCE_FUTURES_TESTNET_URL");
        env::remove_var("DATABASE_PATH");
        env::remove_var("BIND_ADDR");
        env::remove_var("LOG_LEVEL");
    }
}
