use anyhow::Context;
use poly_alert::clock::SystemClock;
use poly_alert::config::Config;
use poly_alert::feed::{CoinGeckoClient, CoinGeckoConfig};
use poly_alert::market::{GammaClient, GammaConfig};
use poly_alert::monitor::Monitor;
use poly_alert::notify::WebhookNotifier;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    poly_alert::telemetry::init_telemetry(&config.telemetry)?;

    let prices = CoinGeckoClient::with_config(CoinGeckoConfig::from(&config.sources))
        .context("Failed to create price client")?;
    let markets = GammaClient::with_config(GammaConfig::from(&config.sources))
        .context("Failed to create Gamma client")?;
    let notifier =
        WebhookNotifier::from_config(&config.notify).context("Failed to create webhook client")?;

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    let monitor = Monitor::new(&config, prices, markets, notifier, SystemClock);
    let summary = monitor.run(stop_rx).await;

    tracing::info!(
        completed = summary.completed,
        failed = summary.failed,
        "Shutting down"
    );

    Ok(())
}
