//! Price feed module
//!
//! Provides the BTC spot price and its trailing 24h change from CoinGecko

mod coingecko;
mod types;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, COINGECKO_API_URL};
pub use types::PriceSignal;

use crate::error::SourceError;
use async_trait::async_trait;

/// Trait for spot price sources
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current spot price and 24h change
    async fn fetch_price(&self) -> Result<PriceSignal, SourceError>;
}
