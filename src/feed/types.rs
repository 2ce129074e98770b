//! Price feed types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Spot price snapshot for the tracked asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSignal {
    /// Spot price in the quote currency (always positive)
    pub spot: Decimal,
    /// Trailing 24h change in percent, if the source reported one
    pub change_24h: Option<Decimal>,
}

impl PriceSignal {
    pub fn new(spot: Decimal, change_24h: Option<Decimal>) -> Self {
        Self { spot, change_24h }
    }
}
