//! poly-alert: new-market alerts for Polymarket BTC 15-minute up/down markets
//!
//! This library provides the core components for:
//! - Spot price and 24h momentum from CoinGecko
//! - Market discovery via Gamma API
//! - Window timing analysis to spot freshly opened markets
//! - Heuristic UP/DOWN prediction from momentum, crowd odds and volume
//! - Alert formatting and webhook delivery with console fallback
//! - A sequential poll loop with back-off after failed cycles

pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod market;
pub mod monitor;
pub mod notify;
pub mod numeric;
pub mod prediction;
pub mod telemetry;
pub mod window;
