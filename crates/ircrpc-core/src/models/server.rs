//! Server projection

use serde::{Deserialize, Serialize};

/// A server in the network as seen from the local server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    /// Uplink name; empty for the root of the spanning tree
    pub parent: String,
    pub description: String,
    pub user_count: u32,
    pub op_count: u32,
    pub latency_ms: u32,
}
