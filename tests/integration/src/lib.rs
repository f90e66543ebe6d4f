//! Shared helpers for the integration tests: compact-JWS envelope builders
//! matching the wire shape the ledger node emits.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;

/// Build a compact JWS string with the given protected header.
pub fn compact_jws(header: serde_json::Value) -> String {
    let protected = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
    format!("{}.e30.c2ln", protected)
}

/// Creation transaction: a DID document signed by a freshly embedded key.
pub fn creation_envelope(kid: &str, sigt: i64) -> String {
    compact_jws(json!({
        "alg": "ES256",
        "cty": "application/did+json",
        "jwk": {"kid": kid},
        "sigt": sigt,
    }))
}

/// Update transaction: a DID document signed by an existing key.
pub fn update_envelope(kid: &str, sigt: i64) -> String {
    compact_jws(json!({
        "alg": "ES256",
        "cty": "application/did+json",
        "kid": kid,
        "sigt": sigt,
    }))
}

/// A transaction with a non-identity payload.
pub fn unrelated_envelope(sigt: i64) -> String {
    compact_jws(json!({
        "alg": "ES256",
        "cty": "application/json",
        "kid": "did:example:other#key-1",
        "sigt": sigt,
    }))
}
