//! Static topology built once from the `ships:` document.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::ShipsConfig;
use crate::error::{CoreError, CoreResult};

pub const MAP_NAME: &str = "Bottle application map";
pub const MAP_RENDERER: &str = "region";
pub const MAP_LAYOUT: &str = "ringCenter";
pub const NODE_RENDERER: &str = "region";

/// A directed source→target connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// `{source}:{target}`.
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Link {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("{source}:{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Nodes and connections of the monitored system. Never changes after
/// [`Topology::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub name: String,
    pub renderer: String,
    pub layout: String,
    /// Node names, one per ship.
    pub nodes: Vec<String>,
    /// Connections keyed by link id.
    pub links: BTreeMap<String, Link>,
}

impl Topology {
    /// Build the topology: one node per ship, one link per ship→client host.
    ///
    /// A client entry that is not a valid `host:port` aborts the build.
    pub fn build(config: &ShipsConfig) -> CoreResult<Self> {
        let mut nodes = Vec::with_capacity(config.ships.len());
        let mut links = BTreeMap::new();

        for (ship_name, ship) in &config.ships {
            nodes.push(ship_name.clone());
            info!(ship = %ship_name, "created tier");

            for address in &ship.clients {
                let (host, _port) = split_host_port(address).map_err(|reason| {
                    CoreError::InvalidClientAddress {
                        ship: ship_name.clone(),
                        address: address.clone(),
                        reason,
                    }
                })?;
                let link = Link::new(ship_name, host);
                info!(connection = %link.id, "creating connection");
                links.insert(link.id.clone(), link);
            }
        }

        Ok(Self {
            name: MAP_NAME.to_string(),
            renderer: MAP_RENDERER.to_string(),
            layout: MAP_LAYOUT.to_string(),
            nodes,
            links,
        })
    }
}

/// Split `host:port` or `[host]:port` into its host and port parts.
pub fn split_host_port(address: &str) -> Result<(&str, &str), &'static str> {
    let Some(colon) = address.rfind(':') else {
        return Err("missing port in address");
    };

    let host = if let Some(rest) = address.strip_prefix('[') {
        let Some(close) = rest.find(']') else {
            return Err("missing ']' in address");
        };
        // Index of ']' in `address`.
        let end = close + 1;
        if end + 1 == address.len() {
            return Err("missing port in address");
        }
        if end + 1 != colon {
            return if address.as_bytes()[end + 1] == b':' {
                Err("too many colons in address")
            } else {
                Err("missing port in address")
            };
        }
        &rest[..close]
    } else {
        let host = &address[..colon];
        if host.contains(':') {
            return Err("too many colons in address");
        }
        host
    };

    if host.contains('[') || host.contains(']') || address[colon + 1..].contains(']') {
        return Err("unexpected bracket in address");
    }

    Ok((host, &address[colon + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Ship;

    fn config(ships: &[(&str, &[&str])]) -> ShipsConfig {
        ShipsConfig {
            ships: ships
                .iter()
                .map(|(name, clients)| {
                    (
                        name.to_string(),
                        Ship {
                            clients: clients.iter().map(|c| c.to_string()).collect(),
                            ..Ship::default()
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn client_address_becomes_keyed_link() {
        let topology = Topology::build(&config(&[("checkout", &["10.0.0.5:8080"])])).unwrap();

        let link = &topology.links["checkout:10.0.0.5"];
        assert_eq!(link.source, "checkout");
        assert_eq!(link.target, "10.0.0.5");
        assert_eq!(topology.nodes, vec!["checkout"]);
    }

    #[test]
    fn every_ship_is_a_node() {
        let topology = Topology::build(&config(&[
            ("api", &["db:5432"]),
            ("db", &[]),
            ("web", &["api:80"]),
        ]))
        .unwrap();

        assert_eq!(topology.nodes, vec!["api", "db", "web"]);
        assert_eq!(topology.links.len(), 2);
        assert_eq!(topology.name, MAP_NAME);
        assert_eq!(topology.layout, MAP_LAYOUT);
    }

    #[test]
    fn same_host_on_two_ports_is_one_link() {
        let topology =
            Topology::build(&config(&[("api", &["db:5432", "db:5433"])])).unwrap();
        assert_eq!(topology.links.len(), 1);
        assert!(topology.links.contains_key("api:db"));
    }

    #[test]
    fn malformed_client_aborts_build() {
        let err = Topology::build(&config(&[("api", &["db"])])).unwrap_err();
        match err {
            CoreError::InvalidClientAddress { ship, address, .. } => {
                assert_eq!(ship, "api");
                assert_eq!(address, "db");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn split_plain_and_bracketed() {
        assert_eq!(split_host_port("db:5432"), Ok(("db", "5432")));
        assert_eq!(split_host_port("[::1]:5432"), Ok(("::1", "5432")));
        assert_eq!(split_host_port(":80"), Ok(("", "80")));
    }

    #[test]
    fn split_rejects_malformed() {
        assert!(split_host_port("db").is_err());
        assert!(split_host_port("::1:5432").is_err());
        assert!(split_host_port("[::1]").is_err());
        assert!(split_host_port("[::1:5432").is_err());
        assert!(split_host_port("[::1]x:5432").is_err());
        assert!(split_host_port("db]:5432").is_err());
    }
}
