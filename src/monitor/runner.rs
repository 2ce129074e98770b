//! Poll loop orchestrator
//!
//! One cycle fetches the price signal and the open markets, then classifies,
//! scores, formats and dispatches every freshly opened market in order.

use super::{CycleReport, Detection, LoopState, LoopTiming, RunSummary};
use crate::clock::Clock;
use crate::config::Config;
use crate::feed::{PriceSignal, PriceSource};
use crate::market::{MarketInstance, MarketSource};
use crate::notify::{AlertContext, AlertFormatter, Notifier};
use crate::numeric::{fixed, thousands};
use crate::prediction::{PredictionEngine, VolumePolicy};
use crate::window::{classify, Classification, WindowPolicy};
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::watch;

/// Sequential new-market monitor
pub struct Monitor<P, M, N, C> {
    prices: P,
    markets: M,
    notifier: N,
    clock: C,
    timing: LoopTiming,
    window: WindowPolicy,
    engine: PredictionEngine,
    formatter: AlertFormatter,
    checks: u64,
}

impl<P, M, N, C> Monitor<P, M, N, C>
where
    P: PriceSource,
    M: MarketSource,
    N: Notifier,
    C: Clock,
{
    pub fn new(config: &Config, prices: P, markets: M, notifier: N, clock: C) -> Self {
        Self {
            prices,
            markets,
            notifier,
            clock,
            timing: LoopTiming::from(&config.monitor),
            window: WindowPolicy::from(&config.policy),
            engine: PredictionEngine::new(VolumePolicy::from(&config.policy)),
            formatter: AlertFormatter::from_config(config),
            checks: 0,
        }
    }

    /// Run cycles until `stop` turns true
    ///
    /// A stop abandons the cycle in progress; alerts already dispatched in it
    /// stay sent.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> RunSummary {
        tracing::info!(
            poll_interval_secs = self.timing.poll_interval.as_secs(),
            error_backoff_secs = self.timing.error_backoff.as_secs(),
            webhook_configured = self.notifier.is_configured(),
            "🚀 Monitor started"
        );
        if !self.notifier.is_configured() {
            tracing::warn!("No webhook configured - notifications will only be printed to console");
        }

        let mut summary = RunSummary::default();
        let mut state = LoopState::Running;

        loop {
            if *stop.borrow() {
                tracing::info!("🛑 Monitor stopped by operator");
                break;
            }

            let cycle = tokio::select! {
                biased;
                _ = stop_requested(&mut stop) => {
                    tracing::info!("🛑 Monitor stopped by operator, cycle abandoned");
                    break;
                }
                result = self.guarded_cycle() => result,
            };

            let completed = match cycle {
                Ok(_) => {
                    summary.completed += 1;
                    true
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(error = %e, "❌ Error in poll cycle");
                    false
                }
            };

            let (next, delay) = self.timing.transition(completed);
            if next != state {
                tracing::info!(from = %state, to = %next, "Poll loop state changed");
                state = next;
            }

            let wake = self.clock.now()
                + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
            tracing::info!(
                sleep_secs = delay.as_secs(),
                next_check = %self.formatter.clock_time(wake),
                "💤 Sleeping until next check"
            );

            if sleep_or_stop(&mut stop, delay).await {
                tracing::info!("🛑 Monitor stopped by operator");
                break;
            }
        }

        summary
    }

    /// Run one cycle, turning a panic into an error
    pub async fn guarded_cycle(&mut self) -> anyhow::Result<CycleReport> {
        AssertUnwindSafe(self.run_cycle())
            .catch_unwind()
            .await
            .map_err(|panic| anyhow::anyhow!("cycle panicked: {}", panic_message(&*panic)))
    }

    /// Run one full detection cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.checks += 1;
        let now = self.clock.now();

        tracing::info!(
            check = self.checks,
            at = %self.formatter.clock_time(now),
            "🔍 Checking for new markets"
        );

        let mut report = CycleReport {
            check: self.checks,
            ..CycleReport::default()
        };

        report.price = match self.prices.fetch_price().await {
            Ok(price) => {
                log_price(&price);
                Some(price)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Price signal unavailable");
                None
            }
        };

        let markets = match self.markets.fetch_markets().await {
            Ok(markets) => markets,
            Err(e) => {
                tracing::warn!(error = %e, "Market source unavailable, skipping detection");
                report.markets_unavailable = true;
                return report;
            }
        };

        report.instances = markets.len();
        tracing::info!(instances = markets.len(), "📊 Fetched active markets");

        for market in &markets {
            let outcome = AssertUnwindSafe(self.process_market(market, report.price.as_ref(), now))
                .catch_unwind()
                .await;

            match outcome {
                Ok(MarketOutcome::Detected(detection)) => report.detections.push(detection),
                Ok(MarketOutcome::NotFresh) => {}
                Ok(MarketOutcome::Unclassifiable) => report.unclassifiable += 1,
                Err(panic) => {
                    report.failed += 1;
                    tracing::error!(
                        slug = %market.slug,
                        error = %panic_message(&*panic),
                        "Market pipeline failed"
                    );
                }
            }
        }

        if report.detections.is_empty() {
            tracing::info!(
                fresh_window_minutes = self.window.fresh_minutes,
                "✅ No newly opened markets"
            );
        } else {
            tracing::info!(
                detected = report.detections.len(),
                delivered = report.delivered(),
                "🎉 New markets detected"
            );
        }

        report
    }

    async fn process_market(
        &self,
        market: &MarketInstance,
        price: Option<&PriceSignal>,
        now: DateTime<Utc>,
    ) -> MarketOutcome {
        let window = match classify(market, now, &self.window) {
            Classification::Classified(window) => window,
            Classification::NotClassifiable(reason) => {
                tracing::debug!(slug = %market.slug, reason = %reason, "Skipping market");
                return MarketOutcome::Unclassifiable;
            }
        };

        if !window.fresh {
            return MarketOutcome::NotFresh;
        }

        tracing::info!(
            slug = %market.slug,
            started = %self.formatter.clock_time(window.start),
            running_minutes = window.elapsed_minutes,
            "🎯 New market detected"
        );

        let prediction = self.engine.predict(price, market);
        let text = self.formatter.format(&AlertContext {
            market,
            price,
            window: &window,
            prediction: &prediction,
        });
        let outcome = self.notifier.dispatch(&text).await;

        MarketOutcome::Detected(Detection {
            slug: market.slug.clone(),
            elapsed_minutes: window.elapsed_minutes,
            direction: prediction.direction,
            confidence: prediction.confidence,
            outcome,
        })
    }
}

enum MarketOutcome {
    Detected(Detection),
    NotFresh,
    Unclassifiable,
}

fn log_price(price: &PriceSignal) {
    let change = price
        .change_24h
        .map(|c| format!("{}%", fixed(c, 2)))
        .unwrap_or_else(|| "n/a".to_string());
    tracing::info!(spot = %thousands(price.spot), change_24h = %change, "💰 BTC price");
}

/// Resolve once a stop is requested; never resolves if the sender is gone
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Sleep for `delay`, returning early with `true` if a stop is requested
async fn sleep_or_stop(stop: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = stop_requested(stop) => true,
        _ = tokio::time::sleep(delay) => false,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
