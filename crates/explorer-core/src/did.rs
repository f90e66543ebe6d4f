use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// A canonical decentralized identifier.
///
/// `Did::parse` accepts any DID URL (`did:<method>:<id>` optionally followed
/// by a path, query, or fragment) and keeps only the base identifier. Two
/// references to the same identity through different sub-resources — say
/// `did:example:abc#key-1` and `did:example:abc#key-2` — parse to the same
/// canonical `Did`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Did(String);

impl Did {
    /// Parse a DID URL, stripping any path, query, or fragment suffix.
    pub fn parse(uri: &str) -> Result<Self, ExplorerError> {
        let base = match uri.find(['/', '?', '#']) {
            Some(idx) => &uri[..idx],
            None => uri,
        };

        let mut parts = base.splitn(3, ':');
        let scheme = parts.next().unwrap_or_default();
        let method = parts.next().unwrap_or_default();
        let id = parts.next().unwrap_or_default();
        if scheme != "did" || method.is_empty() || id.is_empty() {
            return Err(ExplorerError::MalformedEnvelope(format!(
                "not a valid DID: {}",
                uri
            )));
        }

        Ok(Self(base.to_string()))
    }

    /// The canonical DID URI, without any sub-resource suffix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The DID method name.
    pub fn method(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
