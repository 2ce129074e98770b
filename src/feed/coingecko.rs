//! CoinGecko simple-price client

use super::{PriceSignal, PriceSource};
use crate::config::SourcesConfig;
use crate::error::{check_status, SourceError};
use crate::numeric::decimal_from_json;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Configuration for the CoinGecko client
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Asset id, e.g. "bitcoin"
    pub asset_id: String,
    /// Quote currency, e.g. "usd"
    pub quote: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            asset_id: "bitcoin".to_string(),
            quote: "usd".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&SourcesConfig> for CoinGeckoConfig {
    fn from(sources: &SourcesConfig) -> Self {
        Self {
            base_url: sources.price_base_url.clone(),
            asset_id: sources.price_asset_id.clone(),
            quote: sources.price_quote.clone(),
            timeout: Duration::from_secs(sources.price_timeout_secs),
        }
    }
}

/// Client for CoinGecko's `/simple/price` endpoint
pub struct CoinGeckoClient {
    config: CoinGeckoConfig,
    client: Client,
}

impl CoinGeckoClient {
    /// Create a client with custom configuration
    pub fn with_config(config: CoinGeckoConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn change_key(&self) -> String {
        format!("{}_24h_change", self.config.quote)
    }

    /// Extract the price signal from a `/simple/price` body
    ///
    /// Shape: `{"bitcoin": {"usd": 67000.12, "usd_24h_change": 1.23}}`. A
    /// missing or null change is reported as unknown, not as an error.
    fn parse_response(&self, body: &serde_json::Value) -> Result<PriceSignal, SourceError> {
        let asset = body.get(&self.config.asset_id).ok_or_else(|| {
            SourceError::Malformed(format!("missing asset '{}'", self.config.asset_id))
        })?;

        let spot = asset
            .get(&self.config.quote)
            .and_then(decimal_from_json)
            .ok_or_else(|| {
                SourceError::Malformed(format!("missing or invalid '{}' price", self.config.quote))
            })?;

        if spot <= Decimal::ZERO {
            return Err(SourceError::Malformed(format!(
                "non-positive spot price: {spot}"
            )));
        }

        let change_24h = asset.get(self.change_key()).and_then(decimal_from_json);

        Ok(PriceSignal::new(spot, change_24h))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_price(&self) -> Result<PriceSignal, SourceError> {
        let url = format!("{}/simple/price", self.config.base_url);

        tracing::debug!(url = %url, asset = %self.config.asset_id, "Fetching spot price");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", self.config.asset_id.as_str()),
                ("vs_currencies", self.config.quote.as_str()),
                ("include_24hr_change", "true"),
            ])
            .send()
            .await?;

        let body: serde_json::Value = check_status(response).await?.json().await?;
        self.parse_response(&body)
    }
}
