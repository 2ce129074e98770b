//! Poll loop types

use crate::config::MonitorConfig;
use crate::feed::PriceSignal;
use crate::notify::DispatchOutcome;
use crate::prediction::{Confidence, Direction};
use std::fmt;
use std::time::Duration;

/// Poll loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Normal cadence
    Running,
    /// Backing off after a failed cycle
    Recovering,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Running => f.write_str("running"),
            LoopState::Recovering => f.write_str("recovering"),
        }
    }
}

/// Loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub poll_interval: Duration,
    pub error_backoff: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(120),
            error_backoff: Duration::from_secs(60),
        }
    }
}

impl From<&MonitorConfig> for LoopTiming {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            error_backoff: config.error_backoff(),
        }
    }
}

impl LoopTiming {
    /// State after a cycle and how long to sleep before the next one
    pub fn transition(&self, cycle_completed: bool) -> (LoopState, Duration) {
        if cycle_completed {
            (LoopState::Running, self.poll_interval)
        } else {
            (LoopState::Recovering, self.error_backoff)
        }
    }
}

/// A freshly opened market that was alerted on
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub slug: String,
    pub elapsed_minutes: f64,
    pub direction: Direction,
    pub confidence: Confidence,
    pub outcome: DispatchOutcome,
}

/// What one poll cycle saw and did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// 1-based check counter
    pub check: u64,
    /// Price signal, if the source answered
    pub price: Option<PriceSignal>,
    /// Market source failed; detection was skipped
    pub markets_unavailable: bool,
    /// Instances returned by the market source
    pub instances: usize,
    /// Instances without a usable close time
    pub unclassifiable: usize,
    /// Instances whose pipeline panicked
    pub failed: usize,
    pub detections: Vec<Detection>,
}

impl CycleReport {
    pub fn delivered(&self) -> usize {
        self.detections
            .iter()
            .filter(|d| d.outcome.is_delivered())
            .count()
    }
}

/// Totals for one `Monitor::run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that ran to completion
    pub completed: u64,
    /// Cycles that escaped with a failure
    pub failed: u64,
}
