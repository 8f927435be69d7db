//! The traffic map: static topology plus its published metrics.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;
use tracing::info;

use shipmap_core::topology::NODE_RENDERER;
use shipmap_core::{NodeView, Topology, TopologyView};

use crate::accumulator::{RecordError, TrafficAccumulator};

/// State rewritten on every publish.
struct Header {
    max_volume: u64,
    updated: u64,
    nodes: Vec<NodeView>,
}

/// Aggregate root shared by ingestion, queries and the publisher.
pub struct TrafficMap {
    name: String,
    renderer: String,
    layout: String,
    accumulator: TrafficAccumulator,
    header: RwLock<Header>,
}

impl TrafficMap {
    pub fn new(topology: &Topology) -> Self {
        let nodes = topology
            .nodes
            .iter()
            .map(|name| NodeView {
                name: name.clone(),
                renderer: NODE_RENDERER.to_string(),
                max_volume: 0,
                updated: 0,
            })
            .collect();

        Self {
            name: topology.name.clone(),
            renderer: topology.renderer.clone(),
            layout: topology.layout.clone(),
            accumulator: TrafficAccumulator::new(topology),
            header: RwLock::new(Header {
                max_volume: 0,
                updated: 0,
                nodes,
            }),
        }
    }

    pub fn accumulator(&self) -> &TrafficAccumulator {
        &self.accumulator
    }

    pub async fn record_success(&self, connection_id: &str) -> Result<(), RecordError> {
        self.accumulator.record_success(connection_id).await
    }

    pub async fn record_failure(&self, connection_id: &str) -> Result<(), RecordError> {
        self.accumulator.record_failure(connection_id).await
    }

    /// Take a snapshot stamped with the current time.
    pub async fn publish(&self) -> u64 {
        self.publish_at(epoch_secs()).await
    }

    /// Swap every connection's generations, then stamp the map and all
    /// nodes with `epoch`. Returns the new total volume.
    pub async fn publish_at(&self, epoch: u64) -> u64 {
        let volume = self.accumulator.publish().await;

        let mut header = self.header.write().await;
        header.max_volume = volume;
        header.updated = epoch;
        for node in header.nodes.iter_mut() {
            node.updated = epoch;
        }
        drop(header);

        info!(volume, epoch, "took a snapshot");
        volume
    }

    /// The current published state, flattened for the client.
    pub async fn view(&self) -> TopologyView {
        let (max_volume, updated, nodes) = {
            let header = self.header.read().await;
            (header.max_volume, header.updated, header.nodes.clone())
        };

        TopologyView {
            name: self.name.clone(),
            renderer: self.renderer.clone(),
            layout: self.layout.clone(),
            max_volume,
            updated,
            nodes,
            connections: self.accumulator.connections().await,
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
