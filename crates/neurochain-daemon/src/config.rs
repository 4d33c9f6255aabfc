// crates/neurochain-daemon/src/config.rs
//
// Runtime configuration for the NeuroChain daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding `blockchain_data.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URLs of peer replicas (e.g., ["http://10.0.0.2:5000"]).
    /// When empty (default), conflict resolution has nothing to compare against.
    #[serde(default)]
    pub peers: Vec<String>,

    /// This node's publicly reachable URL. Filtered out of `peers` so a node
    /// never resolves against itself.
    #[serde(default)]
    pub self_url: Option<String>,

    /// Seconds between background resolution rounds. 0 disables the loop;
    /// `chain/resolve` still works on demand.
    #[serde(default = "default_resolve_interval_secs")]
    pub resolve_interval_secs: u64,
}

fn default_data_dir() -> String {
    "~/.neurochain/data".to_string()
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_resolve_interval_secs() -> u64 {
    30
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            peers: Vec::new(),
            self_url: None,
            resolve_interval_secs: default_resolve_interval_secs(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Configured peers minus this node's own URL, trailing slashes removed,
    /// duplicates dropped.
    pub fn effective_peers(&self) -> Vec<String> {
        let own = self
            .self_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string());
        let mut peers: Vec<String> = Vec::new();
        for raw in &self.peers {
            let url = raw.trim().trim_end_matches('/').to_string();
            if url.is_empty() || Some(&url) == own.as_ref() || peers.contains(&url) {
                continue;
            }
            peers.push(url);
        }
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = DaemonConfig::parse("").unwrap();
        assert_eq!(config.rpc_port, 5000);
        assert_eq!(config.rpc_host, "127.0.0.1");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.resolve_interval_secs, 30);
        assert!(config.peers.is_empty());
    }

    #[test]
    fn test_parse_overrides() {
        let config = DaemonConfig::parse(
            r#"
            data_dir = "/var/lib/neurochain"
            rpc_port = 5001
            peers = ["http://127.0.0.1:5000", "http://127.0.0.1:5002/"]
            self_url = "http://127.0.0.1:5001"
            resolve_interval_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, "/var/lib/neurochain");
        assert_eq!(config.rpc_port, 5001);
        assert_eq!(config.resolve_interval_secs, 0);
        assert_eq!(config.peers.len(), 2);
    }

    #[test]
    fn test_effective_peers_skips_self_and_duplicates() {
        let config = DaemonConfig {
            peers: vec![
                "http://127.0.0.1:5000/".to_string(),
                "http://127.0.0.1:5001".to_string(),
                "http://127.0.0.1:5000".to_string(),
                "  ".to_string(),
            ],
            self_url: Some("http://127.0.0.1:5001/".to_string()),
            ..DaemonConfig::default()
        };
        assert_eq!(config.effective_peers(), vec!["http://127.0.0.1:5000"]);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(DaemonConfig::parse("rpc_port = \"not a port\"").is_err());
    }
}
