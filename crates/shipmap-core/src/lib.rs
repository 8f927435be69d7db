//! shipmap-core — shared types for the shipmap traffic map.
//!
//! Parses the `ships:` topology document, builds the static topology
//! (one node per group, one connection per group→host pair), and defines
//! the JSON model served to the visualization client.

pub mod config;
pub mod error;
pub mod topology;
pub mod types;

pub use config::{Ship, ShipsConfig};
pub use error::{CoreError, CoreResult};
pub use topology::{Link, Topology};
pub use types::*;
