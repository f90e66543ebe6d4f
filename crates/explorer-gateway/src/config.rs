//! Gateway configuration.
//!
//! Read once at startup from CLI flags with environment-variable fallbacks.
//! The node address is mandatory; the status address falls back to it.

/// Resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the gateway listens on.
    pub listen_addr: String,
    /// Upstream node API address.
    pub node_address: String,
    /// Upstream status address; equals the node address when not set.
    pub status_address: String,
}

impl GatewayConfig {
    /// Normalize raw settings: trim trailing slashes and apply the status
    /// address fallback.
    pub fn resolve(listen_addr: String, node_address: String, status_address: Option<String>) -> Self {
        let node_address = node_address.trim_end_matches('/').to_string();
        let status_address = status_address
            .map(|addr| addr.trim_end_matches('/').to_string())
            .unwrap_or_else(|| node_address.clone());
        Self {
            listen_addr,
            node_address,
            status_address,
        }
    }
}
