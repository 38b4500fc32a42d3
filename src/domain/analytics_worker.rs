//! Background consumer for analytics events.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::analytics_event::{AnalyticsEvent, EventKind};

/// Totals of the events a worker consumed before its channel closed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub shortens: u64,
    pub clicks: u64,
}

/// Drains the analytics channel, logging each event.
///
/// Runs until every sender is dropped, then returns what it saw. Spawned once
/// at startup by [`crate::server::run`].
pub async fn run_analytics_worker(mut rx: mpsc::Receiver<AnalyticsEvent>) -> AnalyticsSummary {
    let mut summary = AnalyticsSummary::default();

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Shorten => summary.shortens += 1,
            EventKind::Click => summary.clicks += 1,
        }

        info!(
            short_code = %event.short_code,
            kind = %event.kind,
            timestamp = %event.timestamp.to_rfc3339(),
            "Consumed analytics event"
        );
    }

    debug!(
        shortens = summary.shortens,
        clicks = summary.clicks,
        "Analytics channel closed"
    );

    summary
}
