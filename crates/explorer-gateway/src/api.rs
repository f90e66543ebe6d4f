//! HTTP API surface for the DID Explorer gateway.
//!
//! Every route runs one stateless fetch-decode-project pipeline against the
//! upstream node. Failures are all-or-nothing: any error in the pipeline maps
//! to a 500 response carrying the error text as a plain-text body, with the
//! kind left undistinguished in the status code.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use explorer_client::NodeService;
use explorer_core::{assemble_graph, extractor_for, project_identities, ExplorerError};

/// Shared per-process state: just the upstream service handle. No caches, no
/// cross-request data.
#[derive(Clone)]
pub struct AppState {
    pub node: Arc<dyn NodeService>,
}

/// Request-boundary error wrapper.
struct ApiError(ExplorerError);

impl From<ExplorerError> for ApiError {
    fn from(err: ExplorerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("unable to handle request: {}", self.0),
        )
            .into_response()
    }
}

fn json_passthrough(body: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

// --- Handlers ---

/// List all known identities, projected from the raw transaction log.
async fn handle_list_dids(State(state): State<AppState>) -> Result<Response, ApiError> {
    let envelopes = state.node.transactions().await?;
    let records = project_identities(&envelopes)?;
    Ok(Json(records).into_response())
}

/// Assemble the peer graph from the node's diagnostics.
async fn handle_peer_graph(State(state): State<AppState>) -> Result<Response, ApiError> {
    let diagnostics = state.node.diagnostics().await?;
    let extractor = extractor_for(diagnostics.content_type.as_deref());
    let local_id = extractor.local_peer_id(&diagnostics.body)?;

    let peers = state.node.peer_diagnostics().await?;
    let graph = assemble_graph(&local_id, &peers);
    Ok(Json(graph).into_response())
}

async fn handle_resolve_did(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.node.resolve_did(&did).await?;
    Ok(json_passthrough(body))
}

async fn handle_get_vc(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.node.vc(&id).await?;
    Ok(json_passthrough(body))
}

async fn handle_search_vcs(
    State(state): State<AppState>,
    Path(concept): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    // The query is forwarded opaquely, but it must at least be JSON.
    serde_json::from_slice::<serde_json::Value>(&body).map_err(|e| {
        ExplorerError::InvalidRequestPayload(format!("search query is not valid JSON: {}", e))
    })?;

    let results = state.node.search_vcs(&concept, body.to_vec()).await?;
    Ok(json_passthrough(results))
}

async fn handle_trusted_issuers(State(state): State<AppState>) -> Result<Response, ApiError> {
    let issuers = state.node.trusted_issuers().await?;
    Ok(Json(issuers).into_response())
}

async fn handle_untrusted_issuers(State(state): State<AppState>) -> Result<Response, ApiError> {
    let issuers = state.node.untrusted_issuers().await?;
    Ok(Json(issuers).into_response())
}

/// Raw DAG export, forwarded with the graphviz content type.
async fn handle_dag(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.node.dag().await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/vnd.graphviz")],
        body,
    )
        .into_response())
}

// --- Router ---

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/did", get(handle_list_dids))
        .route("/api/did/{did}", get(handle_resolve_did))
        .route("/api/network/peergraph", get(handle_peer_graph))
        .route("/api/network/dag", get(handle_dag))
        .route("/api/vc/search/{concept}", post(handle_search_vcs))
        .route("/api/vc/issuers/trusted", get(handle_trusted_issuers))
        .route("/api/vc/issuers/untrusted", get(handle_untrusted_issuers))
        .route("/api/vc/{id}", get(handle_get_vc))
        .with_state(state)
}
