//! Gamma API client for market discovery
//!
//! Fetches open 15-minute BTC up/down events from Polymarket's Gamma API.
//! Each event is one 15-minute window; its markets carry the UP and DOWN
//! outcome prices.

use super::{MarketInstance, MarketSource, OutcomeLeg};
use crate::config::SourcesConfig;
use crate::error::{check_status, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Gamma API base URL
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Price assumed for a leg that reports none
const DEFAULT_LEG_PRICE: &str = "0.5";

/// Configuration for the Gamma client
#[derive(Debug, Clone)]
pub struct GammaConfig {
    /// Base URL for the Gamma API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Event tag selecting the product (e.g. "btc-15m")
    pub tag: String,
    /// Page-size cap
    pub limit: u32,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: GAMMA_API_URL.to_string(),
            timeout: Duration::from_secs(15),
            tag: "btc-15m".to_string(),
            limit: 50,
        }
    }
}

impl From<&SourcesConfig> for GammaConfig {
    fn from(sources: &SourcesConfig) -> Self {
        Self {
            base_url: sources.gamma_base_url.clone(),
            timeout: Duration::from_secs(sources.market_timeout_secs),
            tag: sources.market_tag.clone(),
            limit: sources.market_limit,
        }
    }
}

/// Client for Polymarket's Gamma API
pub struct GammaClient {
    config: GammaConfig,
    client: Client,
}

impl GammaClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: GammaConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    /// Fetch open, active, non-archived events for the configured tag
    async fn fetch_markets(&self) -> Result<Vec<MarketInstance>, SourceError> {
        let url = format!("{}/events", self.config.base_url);
        let limit = self.config.limit.to_string();

        tracing::debug!(url = %url, tag = %self.config.tag, "Fetching events from Gamma API");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("tag", self.config.tag.as_str()),
                ("closed", "false"),
                ("active", "true"),
                ("archived", "false"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let body = check_status(response).await?.text().await?;
        let markets = parse_events(&body)?;

        tracing::debug!(market_count = markets.len(), "Fetched market instances");

        Ok(markets)
    }
}

/// Raw event record from the Gamma API
#[derive(Debug, Deserialize)]
struct GammaEvent {
    /// Event slug (e.g. "btc-updown-15m-1767638700")
    #[serde(default)]
    slug: Option<String>,
    /// Window close time
    #[serde(default, alias = "endDate")]
    end_date_iso: Option<String>,
    /// Markets within the event
    #[serde(default)]
    markets: Vec<GammaMarket>,
    /// Traded volume, number or numeric string
    #[serde(default)]
    volume: Value,
}

/// Raw market record within an event
///
/// Either a single leg (`outcome` + `outcomePrices`) or a binary market whose
/// `outcomes` and `outcomePrices` are parallel arrays. The arrays may arrive
/// as JSON-encoded strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    #[serde(default)]
    outcome: Option<String>,
    #[serde(default)]
    outcomes: Value,
    #[serde(default)]
    outcome_prices: Value,
}

/// Parse a `/events` body into market instances
///
/// A record that does not fit the event shape is skipped; its siblings are
/// still returned.
fn parse_events(body: &str) -> Result<Vec<MarketInstance>, SourceError> {
    let records: Vec<Value> = serde_json::from_str(body)?;

    let markets = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let slug = record.get("slug").and_then(Value::as_str).map(str::to_string);
            match serde_json::from_value::<GammaEvent>(record) {
                Ok(event) => Some(convert_event(event)),
                Err(e) => {
                    tracing::warn!(
                        index,
                        slug = slug.as_deref().unwrap_or("unknown"),
                        error = %e,
                        "Skipping malformed Gamma event"
                    );
                    None
                }
            }
        })
        .collect();

    Ok(markets)
}

fn convert_event(event: GammaEvent) -> MarketInstance {
    let legs = event.markets.iter().flat_map(market_legs).collect();

    MarketInstance {
        slug: event.slug.unwrap_or_else(|| "unknown".to_string()),
        close_time: event.end_date_iso,
        legs,
        volume: value_text(&event.volume).unwrap_or_else(|| "0".to_string()),
    }
}

/// Expand one raw market into its outcome legs
fn market_legs(market: &GammaMarket) -> Vec<OutcomeLeg> {
    let prices = string_list(&market.outcome_prices);

    if let Some(outcome) = &market.outcome {
        let price = prices
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_LEG_PRICE.to_string());
        return vec![OutcomeLeg::new(outcome.clone(), price)];
    }

    string_list(&market.outcomes)
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| {
            let price = prices
                .get(i)
                .cloned()
                .unwrap_or_else(|| DEFAULT_LEG_PRICE.to_string());
            OutcomeLeg::new(outcome, price)
        })
        .collect()
}

/// Read a list of strings from an array or a JSON-encoded array string
///
/// Format: `["0.52", "0.48"]` or `"[\"0.52\", \"0.48\"]"`
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_text).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ Value::Array(_)) => string_list(&inner),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Text of a scalar JSON value, keeping malformed strings intact
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
