//! HttpAgentClient tests against an in-process axum agent endpoint.
//!
//! Covers the full dispatch failure taxonomy over a real socket:
//! success, 5xx with JSON detail, malformed body, timeout, and
//! connection refused.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use maestro_common::AgentRequest;
use maestro_core::{AgentCallError, AgentTransport, Dispatcher, HttpAgentClient, Plan};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_agent_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn request(prompt: &str) -> AgentRequest {
    AgentRequest {
        prompt: prompt.to_string(),
        history: Vec::new(),
        context: None,
        metadata: HashMap::new(),
    }
}

#[tokio::test]
async fn test_successful_agent_call() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|Path(name): Path<String>, Json(req): Json<AgentRequest>| async move {
            Json(json!({
                "response": format!("{} answered: {}", name, req.prompt),
                "sources": ["notes.md"],
                "confidence": 0.9,
                "metadata": {}
            }))
        }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let resp = client
        .call_agent("web-search", &request("latest rust release"))
        .await
        .unwrap();

    assert_eq!(resp.response, "web-search answered: latest rust release");
    assert_eq!(resp.sources, vec!["notes.md"]);
    assert_eq!(resp.confidence, 0.9);
}

#[tokio::test]
async fn test_omitted_confidence_defaults() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async { Json(json!({"response": "ok", "sources": []})) }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let resp = client.call_agent("direct-chat", &request("hi")).await.unwrap();
    assert_eq!(resp.confidence, 0.8);
}

#[tokio::test]
async fn test_5xx_with_json_detail() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "vector store offline"})),
            )
                .into_response()
        }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let err = client
        .call_agent("rag-knowledge", &request("query"))
        .await
        .unwrap_err();

    match err {
        AgentCallError::Status { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail.as_deref(), Some("vector store offline"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_5xx_without_json_body() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream gone").into_response() }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let err = client.call_agent("web-search", &request("q")).await.unwrap_err();

    match err {
        AgentCallError::Status { status, detail } => {
            assert_eq!(status, 502);
            assert_eq!(detail, None);
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async { Json(json!({"unexpected": true})) }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let err = client.call_agent("direct-chat", &request("hi")).await.unwrap_err();
    assert!(matches!(err, AgentCallError::Decode(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_millis(200));
    let err = client
        .call_agent("performance-analyzer", &request("analyze"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentCallError::Transport(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port with no listener
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpAgentClient::new(format!("http://{}", addr), Duration::from_secs(1));
    let err = client.call_agent("direct-chat", &request("hi")).await.unwrap_err();
    assert!(matches!(err, AgentCallError::Transport(_)));
}

// ============================================================================
// Dispatcher over real HTTP
// ============================================================================

#[tokio::test]
async fn test_dispatch_never_raises_over_real_transport() {
    let app = Router::new().route(
        "/api/agents/:name",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "boom"})),
            )
                .into_response()
        }),
    );
    let base_url = spawn_agent_server(app).await;

    let client = HttpAgentClient::new(base_url, Duration::from_secs(5));
    let dispatcher = Dispatcher::new(Arc::new(client));

    let resp = dispatcher
        .dispatch(Plan::KnowledgeSearch, "what broke", &[], &[])
        .await;
    assert_eq!(resp.confidence, 0.0);
    assert!(resp.response.contains("rag-knowledge"));
    assert!(resp.response.contains("boom"));
}
