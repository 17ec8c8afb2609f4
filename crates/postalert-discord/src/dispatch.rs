use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::webhook::{WebhookPayload, WebhookTransport};

/// Waits between webhook posts. Injected so tests do not sleep.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A message the webhook did not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFailure {
    /// Position of the message in the dispatched batch.
    pub index: usize,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failures: Vec<SendFailure>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.sent + self.failures.len()
    }

    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sends messages one at a time, pausing after each post.
///
/// Best effort: a rejected message is logged and recorded, then the next one
/// is sent. Nothing is retried.
pub struct Dispatcher {
    transport: Box<dyn WebhookTransport>,
    pause: Box<dyn Pause>,
    delay: Duration,
}

impl Dispatcher {
    pub fn new(
        transport: Box<dyn WebhookTransport>,
        pause: Box<dyn Pause>,
        delay: Duration,
    ) -> Self {
        Self {
            transport,
            pause,
            delay,
        }
    }

    pub async fn dispatch(&self, webhook_url: &str, messages: &[String]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, message) in messages.iter().enumerate() {
            let reply = self
                .transport
                .post_json(webhook_url, &WebhookPayload::new(message.as_str()))
                .await;

            if reply.is_success() {
                report.sent += 1;
                info!(index, status = reply.status, "alert delivered");
            } else {
                warn!(
                    index,
                    status = reply.status,
                    body = %reply.body,
                    "alert delivery FAILED"
                );
                report.failures.push(SendFailure {
                    index,
                    status: reply.status,
                    body: reply.body,
                });
            }

            // Pause follows every post, the last one included.
            self.pause.pause(self.delay).await;
        }

        report
    }
}
