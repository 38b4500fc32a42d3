//! Best-effort delivery of analytics events and live click updates.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::domain::analytics_event::{AnalyticsEvent, ClickUpdate};

/// Outbound side of the analytics queue and the live-update topic.
///
/// Neither path can fail or block the caller: a full or closed analytics queue
/// drops the event with a warning, and a broadcast with no subscribers is a
/// no-op.
#[derive(Clone)]
pub struct EventPublisher {
    analytics_tx: mpsc::Sender<AnalyticsEvent>,
    live_tx: broadcast::Sender<ClickUpdate>,
}

impl EventPublisher {
    pub fn new(
        analytics_tx: mpsc::Sender<AnalyticsEvent>,
        live_tx: broadcast::Sender<ClickUpdate>,
    ) -> Self {
        Self {
            analytics_tx,
            live_tx,
        }
    }

    /// Publisher whose events go nowhere, for tools that need a service
    /// without a running analytics pipeline.
    pub fn disconnected() -> Self {
        let (analytics_tx, _) = mpsc::channel(1);
        let (live_tx, _) = broadcast::channel(1);
        Self::new(analytics_tx, live_tx)
    }

    pub fn emit(&self, event: AnalyticsEvent) {
        if let Err(e) = self.analytics_tx.try_send(event) {
            match e {
                mpsc::error::TrySendError::Full(event) => {
                    warn!(short_code = %event.short_code, kind = %event.kind, "Analytics queue full, dropping event");
                }
                mpsc::error::TrySendError::Closed(event) => {
                    debug!(short_code = %event.short_code, kind = %event.kind, "Analytics queue closed, dropping event");
                }
            }
        }
    }

    pub fn publish_click(&self, update: ClickUpdate) {
        // Err only means nobody is listening right now
        let _ = self.live_tx.send(update);
    }

    /// Opens a new live-update subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<ClickUpdate> {
        self.live_tx.subscribe()
    }

    /// True while the analytics worker still holds the receiving end.
    pub fn analytics_connected(&self) -> bool {
        !self.analytics_tx.is_closed()
    }

    /// Free slots left in the analytics queue.
    pub fn analytics_capacity(&self) -> usize {
        self.analytics_tx.capacity()
    }
}
