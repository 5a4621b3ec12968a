// src/notify/mod.rs
pub mod format;
pub mod memory;
pub mod telegram;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::error::DeliveryError;
use crate::types::{MatchedRecord, Scope};

pub use memory::MemoryNotifier;
pub use telegram::TelegramNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Markdown,
    Plain,
}

/// One outbound message. Lives only until it is handed to a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub format: MessageFormat,
}

impl NotificationMessage {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: MessageFormat::Markdown,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: MessageFormat::Plain,
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, msg: &NotificationMessage) -> Result<(), DeliveryError>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn merge(self, other: DeliveryReport) -> DeliveryReport {
        DeliveryReport {
            sent: self.sent + other.sent,
            failed: self.failed + other.failed,
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "monitor_notifications_sent_total",
            "Messages accepted by the notification sink."
        );
        describe_counter!(
            "monitor_delivery_errors_total",
            "Messages the notification sink rejected or never received."
        );
    });
}

/// Send one message; failures are logged and counted, never propagated.
pub async fn deliver(notifier: &dyn Notifier, msg: &NotificationMessage) -> DeliveryReport {
    ensure_metrics_described();
    match notifier.send(msg).await {
        Ok(()) => {
            counter!("monitor_notifications_sent_total").increment(1);
            DeliveryReport { sent: 1, failed: 0 }
        }
        Err(e) => {
            tracing::warn!(error = %e, notifier = notifier.name(), "delivery failed");
            counter!("monitor_delivery_errors_total").increment(1);
            DeliveryReport { sent: 0, failed: 1 }
        }
    }
}

/// Live mode: one message per record, in feed order. A failed send does not stop the rest.
pub async fn deliver_live(notifier: &dyn Notifier, matched: &[MatchedRecord]) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for m in matched {
        let r = deliver(notifier, &format::live_alert(m)).await;
        if r.sent > 0 {
            tracing::info!(entry = %m.entry.display_name, id = %m.record.raw_id, "live alert sent");
        }
        report = report.merge(r);
    }
    report
}

/// History mode: exactly one message, digest or none-found.
pub async fn deliver_digest(
    notifier: &dyn Notifier,
    scope: &Scope,
    matched: &[MatchedRecord],
) -> DeliveryReport {
    deliver(notifier, &format::digest(scope, matched)).await
}
