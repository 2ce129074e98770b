//! Alert formatting and delivery
//!
//! Renders a newly opened market into an operator alert and posts it to a
//! webhook, echoing to the console when no webhook is configured.

mod console;
mod format;
mod webhook;

pub use console::{ConsoleSink, MemoryConsole, StdoutConsole};
pub use format::{AlertContext, AlertFormatter, NOT_AVAILABLE};
pub use webhook::WebhookNotifier;

use async_trait::async_trait;

/// Result of handing an alert to the notification channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Channel accepted the alert
    Delivered,
    /// No channel configured; the alert was echoed to the console
    NotConfigured,
    /// Channel unreachable or rejected the alert
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Trait for notification channels
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an alert. Never fails the caller.
    async fn dispatch(&self, text: &str) -> DispatchOutcome;

    /// Whether a remote channel is configured
    fn is_configured(&self) -> bool;
}
