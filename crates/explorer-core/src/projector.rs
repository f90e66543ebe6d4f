//! Identity projection.
//!
//! Folds the ordered transaction log into the current identity registry: one
//! record per canonical DID, carrying the earliest and latest signing time
//! seen across all of that identity's transactions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::did::Did;
use crate::envelope::SignedEnvelope;
use crate::error::ExplorerError;

/// One known identity, aggregated over all its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Canonical DID, without key fragments or other sub-resources.
    pub identifier: String,
    /// Earliest signing time seen for this identity.
    pub created_at: DateTime<Utc>,
    /// Latest signing time seen for this identity.
    pub updated_at: DateTime<Utc>,
}

/// Project the transaction log into a deduplicated identity registry.
///
/// Records appear in first-seen order. Updates widen both timestamp bounds
/// independently, so the result is insensitive to the ordering of a given
/// identity's transactions. Any malformed envelope aborts the whole
/// projection; partial results are never returned.
pub fn project_identities(
    envelopes: &[SignedEnvelope],
) -> Result<Vec<IdentityRecord>, ExplorerError> {
    let mut records: Vec<IdentityRecord> = Vec::new();
    // Canonical DID -> position in `records`, preserving discovery order.
    let mut index: HashMap<String, usize> = HashMap::new();

    for envelope in envelopes {
        if !envelope.is_identity_document() {
            continue;
        }

        let did = Did::parse(envelope.identity_key_id()?)?;
        let signing_time = envelope.signing_time()?;

        match index.get(did.as_str()) {
            Some(&pos) => {
                let record = &mut records[pos];
                if signing_time > record.updated_at {
                    record.updated_at = signing_time;
                }
                if signing_time < record.created_at {
                    record.created_at = signing_time;
                }
            }
            None => {
                index.insert(did.as_str().to_string(), records.len());
                records.push(IdentityRecord {
                    identifier: did.as_str().to_string(),
                    created_at: signing_time,
                    updated_at: signing_time,
                });
            }
        }
    }

    tracing::debug!(
        identities = records.len(),
        transactions = envelopes.len(),
        "projected identity registry"
    );
    Ok(records)
}
