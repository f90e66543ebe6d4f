//! Diagnostics parsing.
//!
//! The status endpoint answers either with a structured JSON document or with
//! free-text diagnostics output, depending on the node version and the Accept
//! negotiation. Both carry the local node's peer id; the text form also
//! carries the connected-peers line. Extraction is one capability with two
//! variants, selected by the response content type.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ExplorerError;
use crate::topology::{assemble_graph, PeerDiagnostics, PeerNode};

fn own_peer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[P2P Network\] Peer ID of local node: (.*)").unwrap())
}

fn connected_peers_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[P2P Network\] Connected peers: (.*)").unwrap())
}

/// Extracts the local node's peer id from a diagnostics response body.
pub trait PeerIdExtractor: Send + Sync {
    fn local_peer_id(&self, body: &str) -> Result<String, ExplorerError>;
}

/// Structured variant: reads the nested `network.peer_id` field.
pub struct JsonDiagnostics;

impl PeerIdExtractor for JsonDiagnostics {
    fn local_peer_id(&self, body: &str) -> Result<String, ExplorerError> {
        let document: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            ExplorerError::MissingDiagnosticField(format!("diagnostics is not valid JSON: {}", e))
        })?;
        document
            .get("network")
            .and_then(|network| network.get("peer_id"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string())
            .ok_or_else(|| {
                ExplorerError::MissingDiagnosticField("network.peer_id not in diagnostics".into())
            })
    }
}

/// Free-text variant: pattern-matches the known local-node line.
pub struct TextDiagnostics;

impl PeerIdExtractor for TextDiagnostics {
    fn local_peer_id(&self, body: &str) -> Result<String, ExplorerError> {
        own_peer_regex()
            .captures(body)
            .map(|captures| captures[1].trim().to_string())
            .ok_or_else(|| {
                ExplorerError::MissingDiagnosticField(
                    "own peer ID line not in diagnostics".into(),
                )
            })
    }
}

/// Select the extraction variant matching the response content type.
pub fn extractor_for(content_type: Option<&str>) -> &'static dyn PeerIdExtractor {
    match content_type {
        Some(ct) if ct.contains("json") => &JsonDiagnostics,
        _ => &TextDiagnostics,
    }
}

/// Build a peer graph from free-text diagnostics alone.
///
/// Parses both the local-node line and the connected-peers line, splitting the
/// peer list on whitespace and each entry on `@` into peer id and connection
/// metadata. Malformed entries are skipped. The graph is assembled through the
/// same path as the structured variant, so the two stay structurally
/// equivalent.
pub fn graph_from_text(diagnostics: &str) -> Result<Vec<PeerNode>, ExplorerError> {
    let local_id = TextDiagnostics.local_peer_id(diagnostics)?;

    let mut local_peers = Vec::new();
    if let Some(captures) = connected_peers_regex().captures(diagnostics) {
        for entry in captures[1].split_whitespace() {
            match entry.split_once('@') {
                Some((peer_id, _address)) if !peer_id.is_empty() => {
                    local_peers.push(peer_id.to_string());
                }
                _ => {
                    tracing::debug!(entry, "skipping malformed connected-peer entry");
                }
            }
        }
    }

    let mut mapping = HashMap::new();
    mapping.insert(local_id.clone(), PeerDiagnostics::new(local_peers));
    Ok(assemble_graph(&local_id, &mapping))
}
