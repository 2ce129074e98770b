//! Alert text rendering

use crate::config::Config;
use crate::feed::PriceSignal;
use crate::market::{MarketInstance, OutcomeLeg};
use crate::numeric::{fixed, parse_decimal, thousands};
use crate::prediction::{Prediction, VolumePolicy, VolumeTier};
use crate::window::{WindowPolicy, WindowState};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Placeholder for values the sources did not provide
pub const NOT_AVAILABLE: &str = "n/a";

const RULE_WIDTH: usize = 50;

/// Everything one alert is rendered from
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub market: &'a MarketInstance,
    pub price: Option<&'a PriceSignal>,
    pub window: &'a WindowState,
    pub prediction: &'a Prediction,
}

/// Renders alerts in a fixed display offset
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    offset: FixedOffset,
    label: String,
    duration_minutes: f64,
    volume: VolumePolicy,
}

impl AlertFormatter {
    pub fn new(
        offset: FixedOffset,
        label: impl Into<String>,
        duration_minutes: f64,
        volume: VolumePolicy,
    ) -> Self {
        Self {
            offset,
            label: label.into(),
            duration_minutes,
            volume,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.monitor.display_offset(),
            config.monitor.display_label.clone(),
            WindowPolicy::from(&config.policy).duration_minutes(),
            VolumePolicy::from(&config.policy),
        )
    }

    /// `HH:MM:SS LABEL` in the display offset
    pub fn clock_time(&self, at: DateTime<Utc>) -> String {
        format!("{} {}", self.local(at).format("%H:%M:%S"), self.label)
    }

    fn short_time(&self, at: DateTime<Utc>) -> String {
        format!("{} {}", self.local(at).format("%H:%M"), self.label)
    }

    fn local(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset)
    }

    /// Render the alert. Missing values are shown as placeholders.
    pub fn format(&self, ctx: &AlertContext<'_>) -> String {
        let AlertContext {
            market,
            price,
            window,
            prediction,
        } = *ctx;

        let rule = "=".repeat(RULE_WIDTH);
        let volume = parse_decimal(&market.volume).ok();
        let warning = volume
            .and_then(|v| self.volume_warning(v))
            .map(|w| format!("\n\n{w}"))
            .unwrap_or_default();
        let analysis: String = prediction
            .rationale
            .iter()
            .map(|line| format!("  • {line}\n"))
            .collect();

        format!(
            "🔔 **NEW MARKET STARTED!**\n\n\
             {rule}\n\
             ⏰ **STARTED AT:** {started_at}\n\
             {rule}\n\n\
             🔗 {url}\n\n\
             📊 **PREDICTION: {direction} {marker} {confidence}**\n\
             Confidence: {confidence}\n\n\
             💡 **Analysis:**\n\
             {analysis}\n\
             💰 **Market Conditions:**\n\
             - BTC: {btc}\n\
             - Odds: {up}% UP / {down}% DOWN\n\
             - Volume: ${volume_shown}{warning}\n\n\
             ⏱️ **Timing:**\n\
             - Started: {started}\n\
             - Closes: {closes}\n\
             - Time to Close: {time_to_close:.1} minutes\n\
             - Running: {running:.1} minutes\n",
            started_at = self.clock_time(window.start),
            url = market.url(),
            direction = prediction.direction,
            marker = prediction.direction.emoji(),
            confidence = prediction.confidence,
            btc = price_line(price),
            up = leg_pct(market.up_leg()),
            down = leg_pct(market.down_leg()),
            volume_shown = volume_text(volume, &market.volume),
            started = self.short_time(window.start),
            closes = self.short_time(window.close),
            time_to_close = self.duration_minutes - window.elapsed_minutes,
            running = window.elapsed_minutes,
        )
    }

    /// Warning block for thin markets, escalating with severity
    pub fn volume_warning(&self, volume: Decimal) -> Option<&'static str> {
        match self.volume.tier(volume) {
            VolumeTier::VeryLow => {
                Some("⚠️ **CRITICAL WARNING: Very low volume - extremely high risk!**")
            }
            VolumeTier::Low => Some("⚠️ **WARNING: Low volume - high risk!**"),
            VolumeTier::Good => None,
        }
    }
}

fn price_line(price: Option<&PriceSignal>) -> String {
    let spot = price
        .map(|p| format!("${}", thousands(p.spot)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    match price.and_then(|p| p.change_24h) {
        Some(change) => {
            let sign = if change >= Decimal::ZERO { "+" } else { "" };
            let marker = if change > Decimal::ZERO { "📈" } else { "📉" };
            format!("{spot} ({sign}{}% 24h) {marker}", fixed(change, 2))
        }
        None => format!("{spot} ({NOT_AVAILABLE} 24h)"),
    }
}

/// Leg probability as a whole percentage; unusable legs read as even odds
fn leg_pct(leg: Option<&OutcomeLeg>) -> String {
    let pct = leg
        .and_then(|l| parse_decimal(&l.price).ok())
        .filter(|p| (Decimal::ZERO..=Decimal::ONE).contains(p))
        .map(|p| p * dec!(100))
        .unwrap_or(dec!(50));
    fixed(pct, 0)
}

fn volume_text(volume: Option<Decimal>, raw: &str) -> String {
    match volume {
        Some(v) => fixed(v, 0),
        None if raw.trim().is_empty() => NOT_AVAILABLE.to_string(),
        None => raw.to_string(),
    }
}
