//! Signed transaction envelopes.
//!
//! Each ledger transaction arrives as a compact JWS string. Only the protected
//! header matters to the gateway: it identifies the payload kind (`cty`), the
//! signing key (`kid` or an embedded `jwk`), and the signing time (a custom
//! numeric `sigt` field). The signature itself is never verified here — the
//! node hands us already-validated transactions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ExplorerError;

/// Content type marking a transaction as carrying a DID document.
pub const DID_DOCUMENT_CONTENT_TYPE: &str = "application/did+json";

/// Key material embedded in the protected header of a creation transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedKey {
    /// Key identifier, a DID URL naming the new identity's key.
    pub kid: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ProtectedHeader {
    #[serde(default)]
    cty: Option<String>,
    #[serde(default)]
    kid: Option<String>,
    #[serde(default)]
    jwk: Option<EmbeddedKey>,
    #[serde(default)]
    sigt: Option<serde_json::Value>,
}

/// One decoded transaction envelope.
///
/// Owned transiently by a single request; immutable once parsed.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    header: ProtectedHeader,
}

impl SignedEnvelope {
    /// Parse a compact JWS string, decoding its protected header.
    pub fn parse(raw: &str) -> Result<Self, ExplorerError> {
        let mut segments = raw.split('.');
        let protected = segments.next().unwrap_or_default();
        if protected.is_empty() || segments.clone().count() != 2 {
            return Err(ExplorerError::MalformedEnvelope(
                "expected a compact JWS with three segments".into(),
            ));
        }

        let header_bytes = URL_SAFE_NO_PAD.decode(protected).map_err(|e| {
            ExplorerError::MalformedEnvelope(format!("protected header is not base64url: {}", e))
        })?;
        let header: ProtectedHeader = serde_json::from_slice(&header_bytes).map_err(|e| {
            ExplorerError::MalformedEnvelope(format!("protected header is not valid JSON: {}", e))
        })?;

        Ok(Self { header })
    }

    /// The `cty` protected-header field, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header.cty.as_deref()
    }

    /// Whether this envelope carries a DID document payload.
    pub fn is_identity_document(&self) -> bool {
        self.content_type() == Some(DID_DOCUMENT_CONTENT_TYPE)
    }

    /// The key identifier naming the identity this envelope belongs to.
    ///
    /// Creation transactions embed a fresh key (`jwk`) whose kid names the new
    /// identity; update transactions reference an existing key via `kid`.
    pub fn identity_key_id(&self) -> Result<&str, ExplorerError> {
        if let Some(jwk) = &self.header.jwk {
            return Ok(&jwk.kid);
        }
        self.header.kid.as_deref().ok_or_else(|| {
            ExplorerError::MalformedEnvelope("envelope has neither jwk nor kid".into())
        })
    }

    /// The signing time from the custom numeric `sigt` header field.
    pub fn signing_time(&self) -> Result<DateTime<Utc>, ExplorerError> {
        let sigt = self
            .header
            .sigt
            .as_ref()
            .ok_or_else(|| ExplorerError::MalformedEnvelope("sigt header missing".into()))?;

        // The upstream writes sigt as a JSON number; some encoders emit it as
        // a float, so truncate rather than reject fractional seconds.
        let secs = sigt
            .as_i64()
            .or_else(|| sigt.as_f64().map(|f| f as i64))
            .ok_or_else(|| {
                ExplorerError::MalformedEnvelope(format!("sigt header is not numeric: {}", sigt))
            })?;

        DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            ExplorerError::MalformedEnvelope(format!("sigt {} is out of range", secs))
        })
    }
}
