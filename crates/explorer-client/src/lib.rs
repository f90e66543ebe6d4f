//! DID Explorer Client — HTTP access to the ledger node's internal APIs.
//!
//! All upstream calls are single blocking fetches with a bounded timeout.
//! A connection failure or timeout fails the corresponding gateway request;
//! there are no retries and no caching.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use url::Url;

use explorer_core::{ExplorerError, PeerDiagnostics, SignedEnvelope};

/// Credential types whose trusted/untrusted issuer lists are exposed.
pub const CREDENTIAL_TYPES: &[&str] = &["OrganizationCredential"];

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// A diagnostics response body together with its content type, so the caller
/// can pick the matching extraction variant.
#[derive(Debug, Clone)]
pub struct DiagnosticsResponse {
    pub body: String,
    pub content_type: Option<String>,
}

/// Everything the gateway needs from the upstream node.
///
/// One implementation speaks HTTP to a real node; tests substitute their own.
#[async_trait]
pub trait NodeService: Send + Sync {
    /// The raw ordered transaction log, decoded into signed envelopes.
    async fn transactions(&self) -> Result<Vec<SignedEnvelope>, ExplorerError>;

    /// The node's own diagnostics, JSON or free text.
    async fn diagnostics(&self) -> Result<DiagnosticsResponse, ExplorerError>;

    /// Per-peer diagnostics: peer id mapped to its reported neighbor list.
    async fn peer_diagnostics(&self) -> Result<HashMap<String, PeerDiagnostics>, ExplorerError>;

    /// DID document resolution, passed through byte-for-byte.
    async fn resolve_did(&self, did: &str) -> Result<Bytes, ExplorerError>;

    /// Verifiable credential retrieval, passed through byte-for-byte.
    async fn vc(&self, id: &str) -> Result<Bytes, ExplorerError>;

    /// Verifiable credential search, passed through byte-for-byte.
    async fn search_vcs(&self, concept: &str, query: Vec<u8>) -> Result<Bytes, ExplorerError>;

    /// Trusted issuer lists per known credential type.
    async fn trusted_issuers(&self) -> Result<HashMap<String, Vec<String>>, ExplorerError>;

    /// Untrusted issuer lists per known credential type.
    async fn untrusted_issuers(&self) -> Result<HashMap<String, Vec<String>>, ExplorerError>;

    /// The raw DAG export in graphviz format.
    async fn dag(&self) -> Result<Bytes, ExplorerError>;
}

/// HTTP implementation of [`NodeService`] against a running ledger node.
pub struct HttpNodeClient {
    api_address: String,
    status_address: String,
    http: reqwest::Client,
}

impl HttpNodeClient {
    /// Create a client for the given node API address and status address.
    ///
    /// Trailing slashes are trimmed so endpoint paths join cleanly.
    pub fn new(api_address: &str, status_address: &str) -> Result<Self, ExplorerError> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(upstream_err)?;
        Ok(Self {
            api_address: api_address.trim_end_matches('/').to_string(),
            status_address: status_address.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, ExplorerError> {
        let response = self.http.get(url).send().await.map_err(upstream_err)?;
        response.bytes().await.map_err(upstream_err)
    }

    /// Build a node API URL with `id` appended as one escaped path segment.
    /// VC ids may contain `#`, which would otherwise truncate the URL.
    fn api_url_with_segment(&self, path: &str, id: &str) -> Result<String, ExplorerError> {
        let mut url = Url::parse(&format!("{}{}", self.api_address, path))
            .map_err(|e| ExplorerError::UpstreamUnavailable(format!("bad node address: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ExplorerError::UpstreamUnavailable("bad node address".into()))?
            .push(id);
        Ok(url.to_string())
    }

    async fn issuers_by_trust(
        &self,
        trust: &str,
    ) -> Result<HashMap<String, Vec<String>>, ExplorerError> {
        let mut result = HashMap::new();
        for credential_type in CREDENTIAL_TYPES {
            let url = format!(
                "{}/internal/vcr/v1/{}/{}",
                self.api_address, credential_type, trust
            );
            let issuers: Vec<String> = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(upstream_err)?
                .json()
                .await
                .map_err(upstream_err)?;
            result.insert(credential_type.to_string(), issuers);
        }
        Ok(result)
    }
}

#[async_trait]
impl NodeService for HttpNodeClient {
    async fn transactions(&self) -> Result<Vec<SignedEnvelope>, ExplorerError> {
        let url = format!("{}/internal/network/v1/transaction", self.api_address);
        let raw: Vec<String> = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(upstream_err)?
            .json()
            .await
            .map_err(upstream_err)?;

        tracing::debug!(count = raw.len(), "fetched transaction log");
        raw.iter().map(|tx| SignedEnvelope::parse(tx)).collect()
    }

    async fn diagnostics(&self) -> Result<DiagnosticsResponse, ExplorerError> {
        let url = format!("{}/status/diagnostics", self.status_address);
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(upstream_err)?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response.text().await.map_err(upstream_err)?;
        Ok(DiagnosticsResponse { body, content_type })
    }

    async fn peer_diagnostics(&self) -> Result<HashMap<String, PeerDiagnostics>, ExplorerError> {
        let url = format!("{}/internal/network/v1/diagnostics/peers", self.api_address);
        self.http
            .get(&url)
            .send()
            .await
            .map_err(upstream_err)?
            .json()
            .await
            .map_err(upstream_err)
    }

    async fn resolve_did(&self, did: &str) -> Result<Bytes, ExplorerError> {
        if !did.starts_with("did:") {
            return Err(ExplorerError::InvalidRequestPayload(format!(
                "invalid DID to resolve: {}",
                did
            )));
        }
        let url = format!("{}/internal/vdr/v1/did/{}", self.api_address, did);
        self.get_bytes(&url).await
    }

    async fn vc(&self, id: &str) -> Result<Bytes, ExplorerError> {
        let url = self.api_url_with_segment("/internal/vcr/v1/vc", id)?;
        self.get_bytes(&url).await
    }

    async fn search_vcs(&self, concept: &str, query: Vec<u8>) -> Result<Bytes, ExplorerError> {
        let url = self.api_url_with_segment("/internal/vcr/v1", concept)?;
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(query)
            .send()
            .await
            .map_err(upstream_err)?;
        response.bytes().await.map_err(upstream_err)
    }

    async fn trusted_issuers(&self) -> Result<HashMap<String, Vec<String>>, ExplorerError> {
        self.issuers_by_trust("trusted").await
    }

    async fn untrusted_issuers(&self) -> Result<HashMap<String, Vec<String>>, ExplorerError> {
        self.issuers_by_trust("untrusted").await
    }

    async fn dag(&self) -> Result<Bytes, ExplorerError> {
        let url = format!(
            "{}/internal/network/v1/diagnostics/graph",
            self.api_address
        );
        self.get_bytes(&url).await
    }
}

fn upstream_err(err: reqwest::Error) -> ExplorerError {
    ExplorerError::UpstreamUnavailable(err.to_string())
}
