//! Integration test: transaction log to identity registry, end to end.
//!
//! Exercises the full path the gateway uses for identity listing: fetch the
//! raw log over HTTP (mocked node), decode each envelope, and project the
//! registry.

use explorer_client::{HttpNodeClient, NodeService};
use explorer_core::{project_identities, ExplorerError, SignedEnvelope};
use explorer_integration_tests::{compact_jws, creation_envelope, unrelated_envelope, update_envelope};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn node_with_transactions(transactions: Vec<String>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internal/network/v1/transaction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(transactions)))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_and_project_full_log() {
    let server = node_with_transactions(vec![
        creation_envelope("did:example:alpha#key-1", 100),
        unrelated_envelope(110),
        creation_envelope("did:example:beta#key-1", 120),
        update_envelope("did:example:alpha#key-2", 50),
        update_envelope("did:example:alpha#key-1", 300),
    ])
    .await;

    let client = HttpNodeClient::new(&server.uri(), &server.uri()).unwrap();
    let envelopes = client.transactions().await.unwrap();
    let records = project_identities(&envelopes).unwrap();

    // Two identities, first-seen order, unrelated payloads skipped.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].identifier, "did:example:alpha");
    assert_eq!(records[1].identifier, "did:example:beta");

    // Bounds widen across out-of-order updates and key fragments.
    assert_eq!(records[0].created_at.timestamp(), 50);
    assert_eq!(records[0].updated_at.timestamp(), 300);
    assert_eq!(records[1].created_at.timestamp(), 120);
    assert_eq!(records[1].updated_at.timestamp(), 120);
    for record in &records {
        assert!(record.created_at <= record.updated_at);
    }
}

#[tokio::test]
async fn test_dedup_over_permutations() {
    let transactions = vec![
        update_envelope("did:example:abc#key-1", 300),
        creation_envelope("did:example:abc#key-2", 100),
        update_envelope("did:example:abc#key-3", 200),
    ];
    let mut reversed = transactions.clone();
    reversed.reverse();

    for log in [transactions, reversed] {
        let server = node_with_transactions(log).await;
        let client = HttpNodeClient::new(&server.uri(), &server.uri()).unwrap();
        let records = project_identities(&client.transactions().await.unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].created_at.timestamp(), 100);
        assert_eq!(records[0].updated_at.timestamp(), 300);
    }
}

#[tokio::test]
async fn test_malformed_log_entry_fails_whole_projection() {
    let server = node_with_transactions(vec![
        creation_envelope("did:example:abc#key-1", 100),
        compact_jws(json!({
            "cty": "application/did+json",
            "kid": "did:example:abc#key-1",
            "sigt": "not-a-number",
        })),
    ])
    .await;

    let client = HttpNodeClient::new(&server.uri(), &server.uri()).unwrap();
    let envelopes = client.transactions().await.unwrap();
    let result = project_identities(&envelopes);
    assert!(matches!(result, Err(ExplorerError::MalformedEnvelope(_))));
}

#[test]
fn test_projection_without_network() {
    // The projector itself is pure; parse the envelopes directly.
    let envelopes: Vec<SignedEnvelope> = [
        creation_envelope("did:example:abc#key-1", 100),
        update_envelope("did:example:abc#key-2", 50),
    ]
    .iter()
    .map(|raw| SignedEnvelope::parse(raw).unwrap())
    .collect();

    let records = project_identities(&envelopes).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].created_at.timestamp(), 50);
    assert_eq!(records[0].updated_at.timestamp(), 100);
}
