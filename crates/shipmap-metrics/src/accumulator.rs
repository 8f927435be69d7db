//! Two-generation counters per connection.
//!
//! The connection table is fixed at construction, so lookups are
//! lock-free. Each connection guards its own pair of generations with a
//! mutex held only for a single increment or a single swap.

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use shipmap_core::{ConnectionView, Metrics, Topology};

/// Result of one observed connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("did not find connection: {0}")]
    UnknownConnection(String),
}

#[derive(Default)]
struct Generations {
    /// Accumulating since the last publish.
    live: Metrics,
    /// Completed by the last publish.
    published: Metrics,
}

struct ConnectionSlot {
    source: String,
    target: String,
    generations: Mutex<Generations>,
}

/// Counters for every connection in the topology.
pub struct TrafficAccumulator {
    slots: BTreeMap<String, ConnectionSlot>,
}

impl TrafficAccumulator {
    /// Create zeroed counters for every link in the topology.
    pub fn new(topology: &Topology) -> Self {
        let slots = topology
            .links
            .values()
            .map(|link| {
                (
                    link.id.clone(),
                    ConnectionSlot {
                        source: link.source.clone(),
                        target: link.target.clone(),
                        generations: Mutex::new(Generations::default()),
                    },
                )
            })
            .collect();
        Self { slots }
    }

    /// Record an observation on the live generation of `connection_id`.
    pub async fn record(&self, connection_id: &str, outcome: Outcome) -> Result<(), RecordError> {
        let slot = self
            .slots
            .get(connection_id)
            .ok_or_else(|| RecordError::UnknownConnection(connection_id.to_string()))?;

        let mut generations = slot.generations.lock().await;
        match outcome {
            Outcome::Success => generations.live.normal += 1,
            Outcome::Failure => generations.live.danger += 1,
        }
        Ok(())
    }

    pub async fn record_success(&self, connection_id: &str) -> Result<(), RecordError> {
        self.record(connection_id, Outcome::Success).await
    }

    pub async fn record_failure(&self, connection_id: &str) -> Result<(), RecordError> {
        self.record(connection_id, Outcome::Failure).await
    }

    /// Move every live generation into published, reset live, and return
    /// the summed published volume.
    ///
    /// Each connection is swapped under its own lock; there is no ordering
    /// across connections.
    pub async fn publish(&self) -> u64 {
        let mut volume = 0;
        for slot in self.slots.values() {
            let mut generations = slot.generations.lock().await;
            generations.published = std::mem::take(&mut generations.live);
            volume += generations.published.sum();
        }
        debug!(connections = self.slots.len(), volume, "generations swapped");
        volume
    }

    /// Last published metrics for a connection.
    pub async fn published(&self, connection_id: &str) -> Option<Metrics> {
        let slot = self.slots.get(connection_id)?;
        Some(slot.generations.lock().await.published)
    }

    /// Metrics accumulated since the last publish.
    pub async fn live(&self, connection_id: &str) -> Option<Metrics> {
        let slot = self.slots.get(connection_id)?;
        Some(slot.generations.lock().await.live)
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.slots.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Published metrics of every connection, flattened for the client.
    pub async fn connections(&self) -> Vec<ConnectionView> {
        let mut views = Vec::with_capacity(self.slots.len());
        for slot in self.slots.values() {
            let metrics = slot.generations.lock().await.published;
            views.push(ConnectionView {
                source: slot.source.clone(),
                target: slot.target.clone(),
                metrics,
            });
        }
        views
    }
}
