use crate::constants::{DEFAULT_BOOTSTRAP_ADDR, DEFAULT_GROUP_ID};
use serde::Deserialize;

/// Runtime configuration, loadable from a TOML file. The listening port
/// always comes from the command line; everything else has defaults so a
/// bare `groupmesh <port>` joins the mesh through the stock rendezvous peer.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Group id this node serves and announces in QUERYSERVERS greetings.
    pub group_id: Option<String>,
    /// Peers dialed once at startup, as `host:port` strings.
    pub bootstrap_nodes: Option<Vec<String>>,
    /// Logging / events configuration
    pub logging: Option<LoggingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            group_id: Some(DEFAULT_GROUP_ID.to_string()),
            bootstrap_nodes: Some(vec![DEFAULT_BOOTSTRAP_ADDR.to_string()]),
            logging: None,
        }
    }
}

impl Config {
    pub fn group_id(&self) -> String {
        self.group_id
            .clone()
            .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string())
    }

    pub fn bootstrap_nodes(&self) -> Vec<String> {
        self.bootstrap_nodes
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_BOOTSTRAP_ADDR.to_string()])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Path to JSON line audit log (rotated). If unset, defaults to logs/mesh_audit.jsonl
    pub json_path: Option<String>,
    /// Max size in bytes before rotation (default 5MB)
    pub json_max_bytes: Option<usize>,
    /// Number of rotated files to retain (default 3)
    pub json_rotate: Option<u32>,
    /// Disable console sink (default false)
    pub disable_console: Option<bool>,
}
