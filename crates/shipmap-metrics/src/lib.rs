//! shipmap-metrics — live traffic metrics for the static topology.
//!
//! Every connection carries two generations of counters: a *live* one
//! receiving increments from ingestion, and a *published* one read by
//! queries. A snapshot swaps live into published and resets live.
//!
//! # Architecture
//!
//! ```text
//! TrafficMap (aggregate root)
//!   ├── TrafficAccumulator
//!   │     ├── record_success() / record_failure() ← ingestion handlers
//!   │     └── publish() → total published volume
//!   ├── publish() → swaps generations, stamps maxVolume + updated
//!   └── view() → TopologyView for the query endpoint
//!
//! SnapshotPublisher
//!   └── run() → periodic publish until shutdown
//! ```

pub mod accumulator;
pub mod map;
pub mod publisher;

pub use accumulator::{Outcome, RecordError, TrafficAccumulator};
pub use map::TrafficMap;
pub use publisher::SnapshotPublisher;
