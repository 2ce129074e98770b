//! Configuration types for poly-alert
//!
//! Every field has a compiled-in default, so an empty config is valid. A TOML
//! file named by `POLY_ALERT_CONFIG` may override tunables, and
//! `NEBULA_WEBHOOK_URL` always selects the notification endpoint.

use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the webhook endpoint
pub const WEBHOOK_ENV: &str = "NEBULA_WEBHOOK_URL";

/// Environment variable holding an optional config file path
pub const CONFIG_PATH_ENV: &str = "POLY_ALERT_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between completed cycles
    pub poll_interval_secs: u64,
    /// Seconds to wait after a cycle fails before retrying
    pub error_backoff_secs: u64,
    /// Fixed display offset from UTC, in hours
    pub display_offset_hours: i32,
    /// Label printed after display times
    pub display_label: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 120,
            error_backoff_secs: 60,
            display_offset_hours: 7,
            display_label: "WIB".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Display offset, falling back to UTC when out of range
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Detection and scoring policy parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Length of every market window
    pub market_duration_minutes: i64,
    /// Upper bound (inclusive) of the "just opened" grace window
    pub fresh_window_minutes: f64,
    /// Volume under this is flagged as very low
    pub critical_volume: Decimal,
    /// Volume under this is flagged as low
    pub low_volume: Decimal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            market_duration_minutes: 15,
            fresh_window_minutes: 3.0,
            critical_volume: Decimal::new(100, 0),
            low_volume: Decimal::new(500, 0),
        }
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub price_base_url: String,
    /// CoinGecko asset id
    pub price_asset_id: String,
    pub price_quote: String,
    pub price_timeout_secs: u64,
    pub gamma_base_url: String,
    /// Gamma event tag selecting the product
    pub market_tag: String,
    pub market_limit: u32,
    pub market_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            price_base_url: "https://api.coingecko.com/api/v3".to_string(),
            price_asset_id: "bitcoin".to_string(),
            price_quote: "usd".to_string(),
            price_timeout_secs: 10,
            gamma_base_url: "https://gamma-api.polymarket.com".to_string(),
            market_tag: "btc-15m".to_string(),
            market_limit: 50,
            market_timeout_secs: 15,
        }
    }
}

/// Notification channel configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Webhook endpoint; `None` means console-only mode
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Build the process configuration from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path)?,
            _ => Self::default(),
        };
        Ok(config.with_webhook_url(std::env::var(WEBHOOK_ENV).ok()))
    }

    /// Override the webhook endpoint; blank values are treated as unset
    pub fn with_webhook_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            let url = url.trim();
            self.notify.webhook_url = if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            };
        }
        self
    }
}
