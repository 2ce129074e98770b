//! Integration tests for configuration loading

use poly_alert::config::{Config, LogFormat};
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_config_file_overrides_tunables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [monitor]
        poll_interval_secs = 90
        display_offset_hours = 0
        display_label = "UTC"

        [policy]
        fresh_window_minutes = 2.0
        critical_volume = 50
        low_volume = 250

        [sources]
        market_tag = "btc-15m"
        market_limit = 20

        [telemetry]
        log_level = "debug"
        log_format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.monitor.poll_interval_secs, 90);
    assert_eq!(config.monitor.error_backoff_secs, 60);
    assert_eq!(config.monitor.display_offset().local_minus_utc(), 0);
    assert_eq!(config.policy.fresh_window_minutes, 2.0);
    assert_eq!(config.policy.critical_volume, dec!(50));
    assert_eq!(config.sources.market_limit, 20);
    assert_eq!(config.notify.timeout_secs, 10);
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
}

#[test]
fn test_webhook_absent_is_console_mode() {
    let config = Config::default().with_webhook_url(None);
    assert!(config.notify.webhook_url.is_none());
}
