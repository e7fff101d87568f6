//! Tests for the configuration builders

use std::path::PathBuf;
use std::time::Duration;

use reportscrape::{ConfigError, ScrapeConfig, StoreConfig};

#[test]
fn test_scrape_defaults_match_batch_pacing() {
    let config = ScrapeConfig::default();

    assert!(config.headless());
    assert_eq!(config.navigation_timeout_secs(), 60);
    assert_eq!(config.selector_wait_timeout_secs(), 15);
    assert_eq!(config.max_retries(), 1);
    assert_eq!(config.retry_backoff(), Duration::from_millis(1000));
    assert_eq!(config.entity_delay(), Duration::from_millis(800));
    assert!(!config.fail_fast());
    assert_eq!(config.chrome_data_dir(), None);
}

#[test]
fn test_builder_defaults_equal_default_impl() {
    let built = ScrapeConfig::builder().build().unwrap();
    let default = ScrapeConfig::default();

    assert_eq!(built.max_retries(), default.max_retries());
    assert_eq!(built.entity_delay(), default.entity_delay());
    assert_eq!(built.navigation_timeout_secs(), default.navigation_timeout_secs());
}

#[test]
fn test_builder_with_all_optional_fields() {
    let config = ScrapeConfig::builder()
        .headless(false)
        .navigation_timeout_secs(30)
        .selector_wait_timeout_secs(0)
        .max_retries(4)
        .retry_backoff_ms(250)
        .entity_delay_ms(0)
        .fail_fast(true)
        .chrome_data_dir(Some("/tmp/reportscrape-profile"))
        .build()
        .unwrap();

    assert!(!config.headless());
    assert_eq!(config.navigation_timeout_secs(), 30);
    assert_eq!(config.selector_wait_timeout_secs(), 0);
    assert_eq!(config.max_retries(), 4);
    assert_eq!(config.retry_backoff(), Duration::from_millis(250));
    assert!(config.entity_delay().is_zero());
    assert!(config.fail_fast());
    assert_eq!(
        config.chrome_data_dir(),
        Some(&PathBuf::from("/tmp/reportscrape-profile"))
    );
}

#[test]
fn test_zero_navigation_timeout_is_rejected() {
    let err = ScrapeConfig::builder()
        .navigation_timeout_secs(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_store_builder_requires_url_and_key() {
    // StoreConfig::builder().build() and .url(..).build() do not compile
    let config = StoreConfig::builder()
        .url("https://abc.supabase.co")
        .service_role_key("secret")
        .build()
        .unwrap();

    assert_eq!(config.url(), "https://abc.supabase.co");
    assert_eq!(config.service_role_key(), "secret");
    assert_eq!(config.entity_table(), "Stock");
    assert_eq!(config.record_table(), "stockdetail");
}

#[test]
fn test_store_table_overrides_in_any_state() {
    let config = StoreConfig::builder()
        .record_table("stock_details")
        .url("http://localhost:54321")
        .entity_table("stocks")
        .service_role_key("secret")
        .build()
        .unwrap();

    assert_eq!(config.entity_table(), "stocks");
    assert_eq!(config.record_table(), "stock_details");
}

#[test]
fn test_store_url_must_be_http() {
    for url in ["abc.supabase.co", "file:///etc/passwd"] {
        let err = StoreConfig::builder()
            .url(url)
            .service_role_key("secret")
            .build()
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidVar { name: "SUPABASE_URL", .. }),
            "{url}"
        );
    }
}
