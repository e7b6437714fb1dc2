//! Anomaly notification dispatch
//!
//! When a rotation arrives from a new network address, the lifecycle
//! manager hands an event to a bounded background channel and moves on.
//! Delivery is best-effort: failures are logged, never surfaced to the
//! rotating caller, and never block the response path.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use vigil_types::UserId;

/// Network-change event carried to the notifier
#[derive(Debug, Clone, Serialize)]
pub struct IpChangeEvent {
    /// Affected user
    pub user_id: UserId,
    /// Address recorded on the session
    #[serde(rename = "original_ip")]
    pub previous_ip: String,
    /// Address the rotation arrived from
    pub new_ip: String,
}

/// Delivery failure raised by a notifier
#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound anomaly notification channel
#[async_trait]
pub trait AnomalyNotifier: Send + Sync {
    /// Deliver one event
    async fn notify(&self, event: &IpChangeEvent) -> Result<(), NotifyError>;
}

/// Posts events as JSON to a configured webhook URL
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier with bounded connection and request timeouts
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl AnomalyNotifier for WebhookNotifier {
    async fn notify(&self, event: &IpChangeEvent) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Fire-and-forget dispatcher over a bounded channel.
///
/// `dispatch` never blocks; if the buffer is full the event is dropped and
/// logged. The background task drains the channel and delivers events one
/// at a time.
#[derive(Clone, Debug)]
pub struct AnomalyDispatcher {
    tx: mpsc::Sender<IpChangeEvent>,
}

impl AnomalyDispatcher {
    /// Spawn the background delivery task.
    ///
    /// Returns the dispatcher and a handle to the task.
    pub fn new(
        notifier: Arc<dyn AnomalyNotifier>,
        buffer_size: usize,
    ) -> (Self, DispatcherHandle) {
        let (tx, rx) = mpsc::channel(buffer_size);

        let handle = DispatcherHandle {
            task: tokio::spawn(Self::run_background(notifier, rx)),
        };

        (Self { tx }, handle)
    }

    /// Queue an event without blocking
    pub fn dispatch(&self, event: IpChangeEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!(error = %e, "anomaly notification buffer full, dropping event");
        }
    }

    async fn run_background(
        notifier: Arc<dyn AnomalyNotifier>,
        mut rx: mpsc::Receiver<IpChangeEvent>,
    ) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = notifier.notify(&event).await {
                tracing::warn!(
                    error = %e,
                    user_id = %event.user_id,
                    "failed to deliver anomaly notification"
                );
            }
        }
    }
}

/// Handle for the background delivery task
pub struct DispatcherHandle {
    task: tokio::task::JoinHandle<()>,
}

impl DispatcherHandle {
    /// Wait for queued events to drain.
    ///
    /// Completes once every clone of the dispatcher has been dropped and
    /// the channel is empty.
    pub async fn shutdown(self) {
        let _ = self.task.await;
    }
}
