//! `ships:` topology document parser.
//!
//! ```yaml
//! ships:
//!   api:
//!     replicas: 2
//!     clients: ["db:5432", "cache:6379"]
//!     servers: [8080]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};

/// The whole topology document: group name → group settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipsConfig {
    pub ships: BTreeMap<String, Ship>,
}

/// One application tier.
///
/// Only `clients` shapes the topology; `replicas` and `servers` are
/// carried for operators reading the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ship {
    pub replicas: i64,
    /// Downstream `host:port` addresses this tier connects to.
    pub clients: Vec<String>,
    /// Ports this tier listens on.
    pub servers: Vec<i64>,
}

impl ShipsConfig {
    /// Parse a YAML document. `path` is only used for error context.
    pub fn from_yaml(content: &str, path: &Path) -> CoreResult<Self> {
        serde_yaml::from_str(content).map_err(|source| CoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `primary`, falling back to `fallback` when the primary
    /// cannot be read. A document that reads but does not parse is fatal
    /// and never falls through to the fallback.
    ///
    /// Returns the config together with the path it came from.
    pub fn load(primary: &Path, fallback: &Path) -> CoreResult<(Self, PathBuf)> {
        let (content, path) = match read(primary) {
            Ok(content) => (content, primary),
            Err(e) => {
                warn!(error = %e, "primary config unavailable, trying fallback");
                match read(fallback) {
                    Ok(content) => (content, fallback),
                    Err(e) => {
                        warn!(error = %e, "fallback config unavailable");
                        return Err(CoreError::NotFound {
                            primary: primary.to_path_buf(),
                            fallback: fallback.to_path_buf(),
                        });
                    }
                }
            }
        };

        let config = Self::from_yaml(&content, path)?;
        info!(path = ?path, ships = config.ships.len(), "initialized with config:\n{content}");
        Ok((config, path.to_path_buf()))
    }
}

fn read(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
ships:
  api:
    replicas: 2
    clients: ["db:5432", "cache:6379"]
    servers: [8080]
  db:
    replicas: 1
    servers: [5432]
"#;

    #[test]
    fn parse_full_document() {
        let config = ShipsConfig::from_yaml(SAMPLE, Path::new("conf.yaml")).unwrap();
        assert_eq!(config.ships.len(), 2);

        let api = &config.ships["api"];
        assert_eq!(api.replicas, 2);
        assert_eq!(api.clients, vec!["db:5432", "cache:6379"]);
        assert_eq!(api.servers, vec![8080]);

        // Missing keys default.
        assert!(config.ships["db"].clients.is_empty());
    }

    #[test]
    fn informational_fields_accept_any_integer() {
        let yaml = "ships:\n  db:\n    replicas: -1\n    clients: [\"disk:9000\"]\n    servers: [70000]\n";
        let config = ShipsConfig::from_yaml(yaml, Path::new("conf.yaml")).unwrap();
        assert_eq!(config.ships["db"].replicas, -1);
        assert_eq!(config.ships["db"].servers, vec![70000]);

        let topology = crate::topology::Topology::build(&config).unwrap();
        assert!(topology.links.contains_key("db:disk"));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let err = ShipsConfig::from_yaml("ships:\n  api:\n    clients: 7\n", Path::new("bad.yaml"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn load_prefers_primary() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("conf.yaml");
        let fallback = dir.path().join("fallback.yaml");
        std::fs::write(&primary, SAMPLE).unwrap();
        std::fs::write(&fallback, "ships:\n  other: {}\n").unwrap();

        let (config, path) = ShipsConfig::load(&primary, &fallback).unwrap();
        assert_eq!(path, primary);
        assert!(config.ships.contains_key("api"));
    }

    #[test]
    fn load_uses_fallback_when_primary_missing() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("missing.yaml");
        let fallback = dir.path().join("fallback.yaml");
        std::fs::write(&fallback, SAMPLE).unwrap();

        let (config, path) = ShipsConfig::load(&primary, &fallback).unwrap();
        assert_eq!(path, fallback);
        assert_eq!(config.ships.len(), 2);
    }

    #[test]
    fn load_fails_when_both_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShipsConfig::load(&dir.path().join("a.yaml"), &dir.path().join("b.yaml"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn load_does_not_fall_back_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("conf.yaml");
        let fallback = dir.path().join("fallback.yaml");
        std::fs::write(&primary, "ships: [not, a, map]\n").unwrap();
        std::fs::write(&fallback, SAMPLE).unwrap();

        let err = ShipsConfig::load(&primary, &fallback).unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref path, .. } if *path == primary));
    }
}
