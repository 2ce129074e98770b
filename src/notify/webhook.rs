//! Webhook notification channel

use super::{ConsoleSink, DispatchOutcome, Notifier, StdoutConsole};
use crate::config::NotifyConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    message: &'a str,
}

/// Posts alerts as `{"message": "..."}` to a webhook
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
    console: Arc<dyn ConsoleSink>,
}

impl WebhookNotifier {
    /// Create a notifier; `url = None` runs in console-only mode
    pub fn new(url: Option<String>, timeout: Duration) -> reqwest::Result<Self> {
        Self::with_console(url, timeout, Arc::new(StdoutConsole))
    }

    pub fn from_config(config: &NotifyConfig) -> reqwest::Result<Self> {
        Self::new(
            config.webhook_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a notifier echoing undelivered alerts to `console`
    pub fn with_console(
        url: Option<String>,
        timeout: Duration,
        console: Arc<dyn ConsoleSink>,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            console,
        })
    }

    async fn post(&self, url: &str, text: &str) -> Result<(), String> {
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { message: text })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn dispatch(&self, text: &str) -> DispatchOutcome {
        let Some(url) = self.url.as_deref() else {
            tracing::warn!("Webhook URL not set - notification not sent");
            self.console.echo(text);
            return DispatchOutcome::NotConfigured;
        };

        match self.post(url, text).await {
            Ok(()) => {
                tracing::info!("✅ Notification sent successfully");
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(error = %e, "❌ Error sending notification");
                self.console.echo(&format!("Message that failed to send:\n{text}"));
                DispatchOutcome::Failed(e)
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}
