/// Gateway-level errors.
///
/// Every failure in the fetch-decode-project pipeline collapses into one of
/// these kinds. The request boundary maps all of them to a 500-class response
/// with the error text as body; kinds are not distinguished in the status code.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("upstream node unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("missing diagnostic field: {0}")]
    MissingDiagnosticField(String),

    #[error("invalid request payload: {0}")]
    InvalidRequestPayload(String),
}
