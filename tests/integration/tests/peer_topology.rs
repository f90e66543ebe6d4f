//! Integration test: peer graph assembly from both diagnostic sources.

use std::collections::{BTreeSet, HashMap};

use explorer_client::{HttpNodeClient, NodeService};
use explorer_core::{
    assemble_graph, extractor_for, graph_from_text, PeerDiagnostics, PeerNode,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Order-insensitive graph fingerprint; output order is unspecified.
fn fingerprint(graph: &[PeerNode]) -> BTreeSet<String> {
    graph
        .iter()
        .map(|n| {
            let mut peers = n.peers.clone();
            peers.sort();
            format!("{}|{}|{}", n.id, n.is_self, peers.join(","))
        })
        .collect()
}

#[tokio::test]
async fn test_structured_pipeline_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/diagnostics"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"network": {"peer_id": "A"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/internal/network/v1/diagnostics/peers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "B": {"peers": ["C"]},
            "C": {"peers": ["B"]},
        })))
        .mount(&server)
        .await;

    let client = HttpNodeClient::new(&server.uri(), &server.uri()).unwrap();
    let diagnostics = client.diagnostics().await.unwrap();
    let extractor = extractor_for(diagnostics.content_type.as_deref());
    let local_id = extractor.local_peer_id(&diagnostics.body).unwrap();
    assert_eq!(local_id, "A");

    let peers = client.peer_diagnostics().await.unwrap();
    let graph = assemble_graph(&local_id, &peers);

    assert_eq!(
        fingerprint(&graph),
        ["A|true|B,C", "B|false|C", "C|false|B"]
            .into_iter()
            .map(String::from)
            .collect()
    );
}

#[tokio::test]
async fn test_text_diagnostics_fallback_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/diagnostics"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string(
                    "[P2P Network] Peer ID of local node: A\n\
                     [P2P Network] Connected peers: B@10.0.0.2:5555 C@10.0.0.3:5555\n",
                ),
        )
        .mount(&server)
        .await;

    let client = HttpNodeClient::new(&server.uri(), &server.uri()).unwrap();
    let diagnostics = client.diagnostics().await.unwrap();
    let graph = graph_from_text(&diagnostics.body).unwrap();

    let local = graph.iter().find(|n| n.is_self).unwrap();
    assert_eq!(local.id, "A");
    assert_eq!(
        local.peers.iter().collect::<BTreeSet<_>>(),
        ["B".to_string(), "C".to_string()].iter().collect()
    );
}

#[test]
fn test_variants_agree_on_equivalent_input() {
    let text = "\
[P2P Network] Peer ID of local node: A
[P2P Network] Connected peers: B@host:1 C@host:2
";
    let textual = graph_from_text(text).unwrap();

    let mut mapping = HashMap::new();
    mapping.insert(
        "A".to_string(),
        PeerDiagnostics::new(vec!["B".into(), "C".into()]),
    );
    let structured = assemble_graph("A", &mapping);

    assert_eq!(fingerprint(&textual), fingerprint(&structured));
}

#[test]
fn test_self_node_unique_even_when_unmapped() {
    let mut mapping = HashMap::new();
    mapping.insert("B".to_string(), PeerDiagnostics::new(vec!["C".into()]));
    let graph = assemble_graph("A", &mapping);
    assert_eq!(graph.iter().filter(|n| n.is_self).count(), 1);
}
