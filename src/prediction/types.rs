//! Prediction types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Predicted direction of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Neutral,
    /// Not enough usable data to score
    Unknown,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Neutral => "NEUTRAL",
            Direction::Unknown => "UNKNOWN",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Up => "📈",
            Direction::Down => "📉",
            Direction::Neutral => "➡️",
            Direction::Unknown => "❔",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence attached to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Liquidity bucket for a market's traded volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTier {
    /// Below the critical threshold
    VeryLow,
    /// Below the low threshold
    Low,
    Good,
}

/// Advisory call for one market window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub direction: Direction,
    pub confidence: Confidence,
    /// One line per contributing factor, in evaluation order
    pub rationale: Vec<String>,
}

impl Prediction {
    /// Unknown/Low with a single explanatory line
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            direction: Direction::Unknown,
            confidence: Confidence::Low,
            rationale: vec![reason.into()],
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.direction == Direction::Unknown
    }
}

/// Numeric input the engine could not use
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictionError {
    #[error("invalid {leg} price '{raw}'")]
    InvalidPrice { leg: &'static str, raw: String },
    #[error("invalid volume '{raw}'")]
    InvalidVolume { raw: String },
}
