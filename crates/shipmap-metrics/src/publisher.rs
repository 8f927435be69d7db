//! Background loop that publishes a snapshot once per interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::map::TrafficMap;

/// Default snapshot interval: one minute of traffic per generation.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

pub struct SnapshotPublisher {
    map: Arc<TrafficMap>,
    interval: Duration,
}

impl SnapshotPublisher {
    pub fn new(map: Arc<TrafficMap>, interval: Duration) -> Self {
        Self { map, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the snapshot loop until the shutdown signal changes or its
    /// sender is dropped. Traffic accumulated since the last tick is not
    /// published on shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "snapshot publisher started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    self.map.publish().await;
                }
                _ = shutdown.changed() => {
                    info!("snapshot publisher shutting down");
                    break;
                }
            }
        }
    }
}
