//! JSON model served to the visualization client.
//!
//! Internal storage is keyed by name; these types are the flattened
//! wire form produced at the serialization boundary.

use serde::{Deserialize, Serialize};

/// Traffic observations for one connection, split into buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub normal: u64,
    pub danger: u64,
    pub warning: u64,
}

impl Metrics {
    /// Total observations across all buckets.
    pub fn sum(&self) -> u64 {
        self.normal + self.danger + self.warning
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub name: String,
    pub renderer: String,
    pub max_volume: u64,
    /// Epoch seconds of the last snapshot, 0 before the first one.
    pub updated: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionView {
    pub source: String,
    pub target: String,
    pub metrics: Metrics,
}

/// The complete document returned by `GET /get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyView {
    pub name: String,
    pub renderer: String,
    pub layout: String,
    pub max_volume: u64,
    pub updated: u64,
    pub nodes: Vec<NodeView>,
    pub connections: Vec<ConnectionView>,
}
