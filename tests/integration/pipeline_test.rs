//! End-to-end tests for classify -> predict -> format -> dispatch

use chrono::{DateTime, Duration, TimeZone, Utc};
use poly_alert::config::Config;
use poly_alert::feed::PriceSignal;
use poly_alert::market::{MarketInstance, OutcomeLeg};
use poly_alert::notify::{AlertContext, AlertFormatter, DispatchOutcome, MemoryConsole, Notifier, WebhookNotifier};
use poly_alert::prediction::{Confidence, Direction, PredictionEngine};
use poly_alert::window::{classify, Classification, WindowPolicy, WindowState};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 18, 30, 0).unwrap()
}

fn market(legs: Vec<OutcomeLeg>, volume: &str) -> MarketInstance {
    MarketInstance {
        slug: "btc-updown-15m-1767638700".to_string(),
        close_time: Some((now() + Duration::seconds(14 * 60 + 30)).to_rfc3339()),
        legs,
        volume: volume.to_string(),
    }
}

fn up_down(up: &str, down: &str) -> Vec<OutcomeLeg> {
    vec![OutcomeLeg::new("Up", up), OutcomeLeg::new("Down", down)]
}

fn fresh_window(m: &MarketInstance) -> WindowState {
    match classify(m, now(), &WindowPolicy::default()) {
        Classification::Classified(state) => state,
        other => panic!("expected classified, got {other:?}"),
    }
}

fn render(m: &MarketInstance, price: Option<&PriceSignal>) -> String {
    let window = fresh_window(m);
    let prediction = PredictionEngine::default().predict(price, m);
    AlertFormatter::from_config(&Config::default()).format(&AlertContext {
        market: m,
        price,
        window: &window,
        prediction: &prediction,
    })
}

#[test]
fn test_scenario_a_just_opened() {
    let m = market(up_down("0.5", "0.5"), "1000");
    let window = fresh_window(&m);
    assert!(window.fresh);
    assert_eq!(window.start, now() - Duration::seconds(30));
    assert!((window.elapsed_minutes - 0.5).abs() < 1e-9);
}

#[test]
fn test_scenario_b_strong_up() {
    let m = market(up_down("0.65", "0.35"), "1000");
    let price = PriceSignal::new(dec!(67250), Some(dec!(3.5)));
    let p = PredictionEngine::default().predict(Some(&price), &m);
    assert_eq!(p.direction, Direction::Up);
    assert_eq!(p.confidence, Confidence::High);
}

#[test]
fn test_scenario_c_single_leg() {
    let m = market(vec![OutcomeLeg::new("Up", "0.65")], "1000");
    let price = PriceSignal::new(dec!(67250), Some(dec!(3.5)));
    let p = PredictionEngine::default().predict(Some(&price), &m);
    assert_eq!(p.direction, Direction::Unknown);
    assert_eq!(p.confidence, Confidence::Low);
    assert!(p.rationale[0].to_lowercase().contains("insufficient"));

    let text = render(&m, Some(&price));
    assert!(text.contains("PREDICTION: UNKNOWN"));
}

#[test]
fn test_scenario_d_volume_warnings() {
    let critical = render(&market(up_down("0.5", "0.5"), "50"), None);
    assert!(critical.contains("CRITICAL WARNING: Very low volume"));

    let moderate = render(&market(up_down("0.5", "0.5"), "300"), None);
    assert!(moderate.contains("**WARNING: Low volume - high risk!**"));
    assert!(!moderate.contains("CRITICAL"));

    let healthy = render(&market(up_down("0.5", "0.5"), "1000"), None);
    assert!(!healthy.contains("WARNING"));
}

#[test]
fn test_format_without_change() {
    let m = market(up_down("0.55", "0.45"), "800");
    let price = PriceSignal::new(dec!(67250), None);
    let text = render(&m, Some(&price));
    assert!(text.contains("(n/a 24h)"));
    assert!(text.contains("- Time to Close: 14.5 minutes"));
}

#[tokio::test]
async fn test_console_only_dispatch_echoes_alert() {
    let console = Arc::new(MemoryConsole::new());
    let notifier =
        WebhookNotifier::with_console(None, std::time::Duration::from_secs(10), console.clone())
            .unwrap();

    let text = render(&market(up_down("0.65", "0.35"), "1000"), None);
    let outcome = notifier.dispatch(&text).await;

    assert_eq!(outcome, DispatchOutcome::NotConfigured);
    assert_eq!(console.echoed(), vec![text]);
}
