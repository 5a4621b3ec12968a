// src/notify/memory.rs
use std::sync::Mutex;

use super::{MessageFormat, NotificationMessage, Notifier};
use crate::error::DeliveryError;

/// Keeps messages in memory and logs them. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<NotificationMessage>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, msg: &NotificationMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            target: "notify",
            markdown = msg.format == MessageFormat::Markdown,
            "dry-run message:\n{}",
            msg.text
        );
        if let Ok(mut m) = self.messages.lock() {
            m.push(msg.clone());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
