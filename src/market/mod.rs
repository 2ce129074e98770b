//! Market discovery module
//!
//! Finds open 15-minute BTC up/down markets via the Gamma API

mod gamma;

pub use gamma::{GammaClient, GammaConfig, GAMMA_API_URL};

use crate::error::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Public page for a market, derived from its slug
pub const MARKET_URL_TEMPLATE: &str = "https://polymarket.com/event/";

/// One outcome of a binary market
///
/// The price is kept as the raw string the API sent so that malformed values
/// surface in the prediction engine rather than at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLeg {
    /// Outcome label, expected to contain "up" or "down"
    pub outcome: String,
    /// Implied probability in [0, 1], as received
    pub price: String,
}

impl OutcomeLeg {
    pub fn new(outcome: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            outcome: outcome.into(),
            price: price.into(),
        }
    }

    /// Case-insensitive substring match on the outcome label
    pub fn is_labelled(&self, needle: &str) -> bool {
        self.outcome.to_lowercase().contains(needle)
    }
}

/// A single 15-minute market window as reported by the market source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInstance {
    /// Event slug (e.g. "btc-updown-15m-1767638700")
    pub slug: String,
    /// Declared close time, RFC 3339, as received
    pub close_time: Option<String>,
    /// Outcome legs
    pub legs: Vec<OutcomeLeg>,
    /// Aggregate traded volume, as received
    pub volume: String,
}

impl MarketInstance {
    /// Public market URL
    pub fn url(&self) -> String {
        format!("{}{}", MARKET_URL_TEMPLATE, self.slug)
    }

    /// First leg whose label contains "up"
    pub fn up_leg(&self) -> Option<&OutcomeLeg> {
        self.legs.iter().find(|leg| leg.is_labelled("up"))
    }

    /// First leg whose label contains "down"
    pub fn down_leg(&self) -> Option<&OutcomeLeg> {
        self.legs.iter().find(|leg| leg.is_labelled("down"))
    }
}

/// Trait for market source implementations
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch every currently open market instance for the tracked product
    async fn fetch_markets(&self) -> Result<Vec<MarketInstance>, SourceError>;
}
