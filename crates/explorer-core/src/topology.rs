//! Peer topology assembly.
//!
//! Merges a node's own diagnostics (which names its local peer id) with the
//! per-peer diagnostics map (each peer's self-reported neighbor list) into one
//! consistent graph: exactly one self node, no duplicate ids, every referenced
//! neighbor present, and no null peer arrays on the wire.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One participant in the peer graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerNode {
    pub id: String,
    pub is_self: bool,
    /// Neighbor ids. Always a concrete array; the web frontend breaks on null.
    pub peers: Vec<String>,
}

/// A peer's self-reported diagnostics, as returned by the node's
/// peer-diagnostics endpoint. Unknown fields are ignored; an absent or null
/// neighbor list normalizes to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeerDiagnostics {
    #[serde(default)]
    peers: Option<Vec<String>>,
}

impl PeerDiagnostics {
    pub fn new(peers: Vec<String>) -> Self {
        Self { peers: Some(peers) }
    }

    /// The reported neighbor list, normalized to an empty slice when absent.
    pub fn peer_list(&self) -> &[String] {
        self.peers.as_deref().unwrap_or(&[])
    }
}

/// Assemble the peer graph from the local node's id and the per-peer
/// diagnostics map.
///
/// The local node is considered connected to every peer it received
/// diagnostics from, even when that peer's own reported list omits it —
/// upstream reports edges one-directionally and dropping them would thin the
/// graph. Output order is unspecified.
pub fn assemble_graph(
    local_id: &str,
    peer_diagnostics: &HashMap<String, PeerDiagnostics>,
) -> Vec<PeerNode> {
    let mut nodes: HashMap<String, PeerNode> = HashMap::new();

    for (peer_id, diagnostics) in peer_diagnostics {
        let mut peers = Vec::new();
        for neighbor in diagnostics.peer_list() {
            if !peers.contains(neighbor) {
                peers.push(neighbor.clone());
            }
        }
        nodes.insert(
            peer_id.clone(),
            PeerNode {
                id: peer_id.clone(),
                is_self: peer_id == local_id,
                peers,
            },
        );
    }

    // Reciprocal visibility: the local node saw diagnostics from every mapped
    // peer, so each of them is an edge regardless of what it reported back.
    let mut local_peers = nodes
        .get(local_id)
        .map(|n| n.peers.clone())
        .unwrap_or_default();
    for peer_id in peer_diagnostics.keys() {
        if peer_id != local_id && !local_peers.contains(peer_id) {
            local_peers.push(peer_id.clone());
        }
    }
    nodes.insert(
        local_id.to_string(),
        PeerNode {
            id: local_id.to_string(),
            is_self: true,
            peers: local_peers,
        },
    );

    // Every id referenced as a neighbor exists as a node of its own.
    let referenced: Vec<String> = nodes
        .values()
        .flat_map(|n| n.peers.iter().cloned())
        .collect();
    for neighbor in referenced {
        nodes.entry(neighbor.clone()).or_insert_with(|| PeerNode {
            id: neighbor,
            is_self: false,
            peers: Vec::new(),
        });
    }

    nodes.into_values().collect()
}
