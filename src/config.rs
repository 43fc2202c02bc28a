//! Typed, `serde`-deserialized settings for each of the toolkit's three server roles,
//! read from a TOML file via the `config` crate. A Paxos node, a 2PC coordinator, and a
//! 2PC participant each get their own struct rather than sharing one untyped shape.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

fn default_peer_timeout_ms() -> u64 {
    500
}

/// Static configuration for one Paxos node. `cluster` lists every node's address,
/// including this node's own; `node_index` is this node's position within it.
#[derive(Debug, Clone, Deserialize)]
pub struct PaxosNodeConfig {
    pub node_id: usize,
    pub node_index: usize,
    pub cluster: Vec<SocketAddr>,
    pub auth_key: String,
    pub listen_addr: SocketAddr,
    pub replica_file: PathBuf,
    #[serde(default = "default_peer_timeout_ms")]
    pub peer_timeout_ms: u64,
}

impl PaxosNodeConfig {
    /// Addresses of the other nodes in the cluster (everyone but `self`).
    pub fn peer_addrs(&self) -> Vec<SocketAddr> {
        self.cluster
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.node_index)
            .map(|(_, addr)| *addr)
            .collect()
    }

    pub fn majority(&self) -> usize {
        self.cluster.len() / 2 + 1
    }
}

/// Static configuration for the 2PC coordinator.
#[derive(Debug, Clone, Deserialize)]
pub struct TwoPcCoordinatorConfig {
    pub listen_addr: SocketAddr,
    pub participant_a: SocketAddr,
    pub participant_b: SocketAddr,
    pub auth_key: String,
    pub log_file: PathBuf,
    #[serde(default = "default_peer_timeout_ms")]
    pub peer_timeout_ms: u64,
}

/// Static configuration for one 2PC participant (resource manager).
#[derive(Debug, Clone, Deserialize)]
pub struct TwoPcParticipantConfig {
    pub listen_addr: SocketAddr,
    pub account_name: String,
    pub account_file: PathBuf,
    pub log_file: PathBuf,
    pub auth_key: String,
    #[serde(default)]
    pub crash_before_vote: bool,
    #[serde(default)]
    pub crash_after_vote: bool,
}

fn load<T: for<'de> Deserialize<'de>>(file_name: &str) -> Result<T, ConfigError> {
    Config::builder()
        .add_source(File::with_name(file_name))
        .build()?
        .try_deserialize()
}

pub fn load_paxos_node_config(file_name: &str) -> Result<PaxosNodeConfig, ConfigError> {
    load(file_name)
}

pub fn load_coordinator_config(file_name: &str) -> Result<TwoPcCoordinatorConfig, ConfigError> {
    load(file_name)
}

pub fn load_participant_config(file_name: &str) -> Result<TwoPcParticipantConfig, ConfigError> {
    load(file_name)
}
