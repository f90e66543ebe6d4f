//! DID Explorer Core — envelope decoding, identity projection, and peer
//! topology assembly for the ledger-node gateway.
//!
//! Everything here is pure: no I/O, no shared state. Each gateway request
//! builds its own envelopes and maps, projects, and throws them away.

pub mod diagnostics;
pub mod did;
pub mod envelope;
pub mod error;
pub mod projector;
pub mod topology;

pub use diagnostics::{extractor_for, graph_from_text, JsonDiagnostics, PeerIdExtractor, TextDiagnostics};
pub use did::Did;
pub use envelope::{SignedEnvelope, DID_DOCUMENT_CONTENT_TYPE};
pub use error::ExplorerError;
pub use projector::{project_identities, IdentityRecord};
pub use topology::{assemble_graph, PeerDiagnostics, PeerNode};
