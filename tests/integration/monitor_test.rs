//! Integration tests for the poll loop with in-memory collaborators

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use poly_alert::clock::FixedClock;
use poly_alert::config::Config;
use poly_alert::error::SourceError;
use poly_alert::feed::{PriceSignal, PriceSource};
use poly_alert::market::{MarketInstance, MarketSource, OutcomeLeg};
use poly_alert::monitor::Monitor;
use poly_alert::notify::{MemoryConsole, WebhookNotifier};
use poly_alert::notify::DispatchOutcome;
use poly_alert::prediction::{Confidence, Direction};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 18, 30, 0).unwrap()
}

struct StaticPrice(PriceSignal);

#[async_trait]
impl PriceSource for StaticPrice {
    async fn fetch_price(&self) -> Result<PriceSignal, SourceError> {
        Ok(self.0.clone())
    }
}

struct StaticMarkets(Vec<MarketInstance>);

#[async_trait]
impl MarketSource for StaticMarkets {
    async fn fetch_markets(&self) -> Result<Vec<MarketInstance>, SourceError> {
        Ok(self.0.clone())
    }
}

fn market(slug: &str, close_in: Duration, legs: Vec<OutcomeLeg>, volume: &str) -> MarketInstance {
    MarketInstance {
        slug: slug.to_string(),
        close_time: Some((now() + close_in).to_rfc3339()),
        legs,
        volume: volume.to_string(),
    }
}

#[tokio::test]
async fn test_console_mode_cycle() {
    let markets = StaticMarkets(vec![
        market(
            "btc-updown-15m-a",
            Duration::seconds(14 * 60 + 30),
            vec![OutcomeLeg::new("Up", "0.65"), OutcomeLeg::new("Down", "0.35")],
            "1000",
        ),
        market(
            "btc-updown-15m-b",
            Duration::minutes(13),
            vec![OutcomeLeg::new("Up", "0.65")],
            "50",
        ),
        market(
            "btc-updown-15m-c",
            Duration::minutes(30),
            vec![OutcomeLeg::new("Up", "0.5"), OutcomeLeg::new("Down", "0.5")],
            "1000",
        ),
    ]);

    let console = Arc::new(MemoryConsole::new());
    let notifier =
        WebhookNotifier::with_console(None, std::time::Duration::from_secs(10), console.clone())
            .unwrap();
    let price = StaticPrice(PriceSignal::new(dec!(67250), Some(dec!(3.5))));

    let mut monitor = Monitor::new(&Config::default(), price, markets, notifier, FixedClock(now()));
    let report = monitor.run_cycle().await;

    assert_eq!(report.instances, 3);
    assert_eq!(report.detections.len(), 2);
    assert_eq!(report.delivered(), 0);

    let a = &report.detections[0];
    assert_eq!(a.slug, "btc-updown-15m-a");
    assert_eq!((a.direction, a.confidence), (Direction::Up, Confidence::High));
    assert_eq!(a.outcome, DispatchOutcome::NotConfigured);

    let b = &report.detections[1];
    assert_eq!(b.direction, Direction::Unknown);

    let echoed = console.echoed();
    assert_eq!(echoed.len(), 2);
    assert!(echoed[0].contains("https://polymarket.com/event/btc-updown-15m-a"));
    assert!(echoed[1].contains("CRITICAL WARNING"));
}
