//! Heuristic scoring engine
//!
//! Integer points are accumulated from two factors and mapped to a label:
//!
//! | factor   | condition               | points |
//! |----------|-------------------------|--------|
//! | momentum | 24h change > 2%         | +2     |
//! | momentum | 0.5% < change <= 2%     | +1     |
//! | momentum | -2% <= change < -0.5%   | -1     |
//! | momentum | change < -2%            | -2     |
//! | crowd    | up odds - down odds > 10| +1     |
//! | crowd    | up odds - down odds <-10| -1     |
//!
//! Volume is reported in the rationale but never scored.

use super::{Confidence, Direction, Prediction, PredictionError, VolumeTier};
use crate::config::PolicyConfig;
use crate::feed::PriceSignal;
use crate::market::{MarketInstance, OutcomeLeg};
use crate::numeric::{fixed, parse_decimal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const STRONG_MOVE_PCT: Decimal = dec!(2);
const MILD_MOVE_PCT: Decimal = dec!(0.5);
const CROWD_LEAN_PCT: Decimal = dec!(10);

/// Absolute volume thresholds, in the market's quote currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumePolicy {
    pub critical: Decimal,
    pub low: Decimal,
}

impl Default for VolumePolicy {
    fn default() -> Self {
        Self {
            critical: dec!(100),
            low: dec!(500),
        }
    }
}

impl From<&PolicyConfig> for VolumePolicy {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            critical: policy.critical_volume,
            low: policy.low_volume,
        }
    }
}

impl VolumePolicy {
    pub fn tier(&self, volume: Decimal) -> VolumeTier {
        if volume < self.critical {
            VolumeTier::VeryLow
        } else if volume < self.low {
            VolumeTier::Low
        } else {
            VolumeTier::Good
        }
    }
}

/// Map an accumulated score to direction and confidence
pub fn label_score(score: i32) -> (Direction, Confidence) {
    match score {
        s if s >= 3 => (Direction::Up, Confidence::High),
        2 => (Direction::Up, Confidence::Medium),
        -2 => (Direction::Down, Confidence::Medium),
        s if s <= -3 => (Direction::Down, Confidence::High),
        _ => (Direction::Neutral, Confidence::Low),
    }
}

/// Pure scoring over a market snapshot and the external price signal
#[derive(Debug, Clone, Default)]
pub struct PredictionEngine {
    volume: VolumePolicy,
}

impl PredictionEngine {
    pub fn new(volume: VolumePolicy) -> Self {
        Self { volume }
    }

    /// Score a market. Never fails: bad input yields Unknown/Low.
    pub fn predict(&self, price: Option<&PriceSignal>, market: &MarketInstance) -> Prediction {
        let change_24h = price.and_then(|p| p.change_24h);
        match self.score(change_24h, market) {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::debug!(slug = %market.slug, error = %e, "Prediction degraded to unknown");
                Prediction::unknown(format!("Error in prediction: {e}"))
            }
        }
    }

    fn score(
        &self,
        change_24h: Option<Decimal>,
        market: &MarketInstance,
    ) -> Result<Prediction, PredictionError> {
        if market.legs.len() < 2 {
            return Ok(Prediction::unknown(
                "Insufficient market data: fewer than two outcomes",
            ));
        }

        let (Some(up), Some(down)) = (market.up_leg(), market.down_leg()) else {
            return Ok(Prediction::unknown(
                "Insufficient market data: cannot find UP/DOWN outcomes",
            ));
        };

        let up_odds = leg_odds(up, "UP")?;
        let down_odds = leg_odds(down, "DOWN")?;
        let volume = parse_volume(&market.volume)?;

        let mut score = 0;
        let mut rationale = Vec::with_capacity(3);

        if let Some(change) = change_24h {
            let (points, line) = momentum_factor(change);
            score += points;
            rationale.push(line);
        }

        let (points, line) = crowd_factor(up_odds, down_odds);
        score += points;
        rationale.push(line);

        rationale.push(self.volume_line(volume));

        let (direction, confidence) = label_score(score);
        Ok(Prediction {
            direction,
            confidence,
            rationale,
        })
    }

    fn volume_line(&self, volume: Decimal) -> String {
        let shown = fixed(volume, 0);
        match self.volume.tier(volume) {
            VolumeTier::VeryLow => format!("⚠️ Very low volume (${shown}) - high risk!"),
            VolumeTier::Low => format!("Low volume (${shown}) - moderate risk"),
            VolumeTier::Good => format!("Good volume (${shown})"),
        }
    }
}

/// Leg probability as a percentage
fn leg_odds(leg: &OutcomeLeg, name: &'static str) -> Result<Decimal, PredictionError> {
    let invalid = || PredictionError::InvalidPrice {
        leg: name,
        raw: leg.price.clone(),
    };
    let p = parse_decimal(&leg.price).map_err(|_| invalid())?;
    if p < Decimal::ZERO || p > Decimal::ONE {
        return Err(invalid());
    }
    Ok(p * dec!(100))
}

fn parse_volume(raw: &str) -> Result<Decimal, PredictionError> {
    match parse_decimal(raw) {
        Ok(v) if v >= Decimal::ZERO => Ok(v),
        _ => Err(PredictionError::InvalidVolume {
            raw: raw.to_string(),
        }),
    }
}

fn momentum_factor(change: Decimal) -> (i32, String) {
    let shown = signed_pct(change);
    if change > STRONG_MOVE_PCT {
        (2, format!("BTC strong bullish momentum ({shown})"))
    } else if change > MILD_MOVE_PCT {
        (1, format!("BTC bullish ({shown})"))
    } else if change < -STRONG_MOVE_PCT {
        (-2, format!("BTC strong bearish momentum ({shown})"))
    } else if change < -MILD_MOVE_PCT {
        (-1, format!("BTC bearish ({shown})"))
    } else {
        (0, format!("BTC neutral ({shown})"))
    }
}

fn crowd_factor(up_odds: Decimal, down_odds: Decimal) -> (i32, String) {
    let odds = format!("{}% vs {}%", fixed(up_odds, 0), fixed(down_odds, 0));
    let diff = up_odds - down_odds;
    if diff > CROWD_LEAN_PCT {
        (1, format!("Crowd leans UP ({odds})"))
    } else if diff < -CROWD_LEAN_PCT {
        (-1, format!("Crowd leans DOWN ({odds})"))
    } else {
        (0, format!("Crowd neutral ({odds})"))
    }
}

fn signed_pct(change: Decimal) -> String {
    if change > Decimal::ZERO {
        format!("+{}%", fixed(change, 2))
    } else {
        format!("{}%", fixed(change, 2))
    }
}
