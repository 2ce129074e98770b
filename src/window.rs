//! Market window timing
//!
//! Classifies a market instance as freshly opened from its declared close
//! time. Start is derived as close minus the fixed market duration.

use crate::config::PolicyConfig;
use crate::market::MarketInstance;
use chrono::{DateTime, Duration, Utc};

/// Timing policy for window classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPolicy {
    /// Length of every market window
    pub duration: Duration,
    /// Inclusive upper bound on elapsed minutes for a fresh window
    pub fresh_minutes: f64,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            duration: Duration::minutes(15),
            fresh_minutes: 3.0,
        }
    }
}

impl From<&PolicyConfig> for WindowPolicy {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            duration: Duration::minutes(policy.market_duration_minutes),
            fresh_minutes: policy.fresh_window_minutes,
        }
    }
}

impl WindowPolicy {
    /// Window length in fractional minutes
    pub fn duration_minutes(&self) -> f64 {
        minutes(self.duration)
    }
}

/// Timing of one market window at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    pub start: DateTime<Utc>,
    pub close: DateTime<Utc>,
    /// Minutes since start; negative before the window opens
    pub elapsed_minutes: f64,
    /// Running and within the grace window
    pub fresh: bool,
}

impl WindowState {
    /// Whether `now` fell inside `[start, close]`
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.close
    }
}

/// Outcome of classifying one market instance
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Classified(WindowState),
    /// No usable close time; the instance is skipped
    NotClassifiable(String),
}

impl Classification {
    /// The window state, if the market was fresh
    pub fn fresh(&self) -> Option<&WindowState> {
        match self {
            Classification::Classified(state) if state.fresh => Some(state),
            _ => None,
        }
    }
}

/// Classify a market instance against `now`
pub fn classify(
    market: &MarketInstance,
    now: DateTime<Utc>,
    policy: &WindowPolicy,
) -> Classification {
    let Some(raw) = market.close_time.as_deref() else {
        return Classification::NotClassifiable("missing close time".to_string());
    };

    let close = match parse_close_time(raw) {
        Some(close) => close,
        None => {
            return Classification::NotClassifiable(format!("unparsable close time: {raw}"));
        }
    };

    let start = close - policy.duration;
    let elapsed_minutes = minutes(now - start);
    let running = start <= now && now <= close;
    let fresh = running && (0.0..=policy.fresh_minutes).contains(&elapsed_minutes);

    Classification::Classified(WindowState {
        start,
        close,
        elapsed_minutes,
        fresh,
    })
}

fn parse_close_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn minutes(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 60_000.0
}
