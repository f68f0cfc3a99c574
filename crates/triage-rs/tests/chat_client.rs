//! Integration tests for the HTTP client and the full classify-and-store flow.
//!
//! Each test starts a stub OpenAI-compatible server on a random port and
//! points a real [`ChatClient`] at it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};
use triage_rs::api::{ChatRequest, Message};
use triage_rs::prelude::*;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.seen.lock().unwrap().push((auth, body));
    (stub.status, Json(stub.body.clone()))
}

/// Spawn the stub and return its base URL plus the captured requests.
async fn spawn_stub(
    status: StatusCode,
    body: Value,
) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
    let seen = Arc::new(Mutex::new(vec![]));
    let stub = Stub {
        status,
        body,
        seen: seen.clone(),
    };
    let router = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}/v1"), seen)
}

fn reply(content: &str) -> Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
    })
}

fn classifier_for(base_url: &str) -> Classifier {
    let config = TriageConfig::new("gsk_test").with_api_base_url(base_url);
    Classifier::new(Arc::new(ChatClient::new(&config).unwrap()))
}

#[tokio::test]
async fn end_to_end_fever_and_cough() {
    let (base, seen) = spawn_stub(
        StatusCode::OK,
        reply("Triage Level: 3 - Abnormal but stable vitals\n"),
    )
    .await;
    let classifier = classifier_for(&base);
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("triage_results.csv"));

    let record = submit(&classifier, "fever and cough")
        .await
        .into_record()
        .unwrap();
    store.append(&record).unwrap();

    assert_eq!(
        record,
        ClassificationRecord::new(
            "fever and cough",
            "Triage Level: 3 - Abnormal but stable vitals"
        )
    );
    assert_eq!(
        std::fs::read_to_string(store.path()).unwrap(),
        "Symptoms,Triage Assessment\nfever and cough,Triage Level: 3 - Abnormal but stable vitals\n"
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer gsk_test"));
    assert_eq!(body["model"], triage_rs::DEFAULT_MODEL);
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("fever and cough"));
    for level in TriageLevel::ALL {
        assert!(prompt.contains(level.label()), "missing {level}");
    }
}

#[tokio::test]
async fn http_error_maps_to_error_assessment() {
    let (base, _) = spawn_stub(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Invalid API Key", "type": "invalid_request_error"}}),
    )
    .await;

    let submission = submit(&classifier_for(&base), "headache").await;
    let record = submission.record().unwrap();
    assert_eq!(record.assessment, "Error: API HTTP 401: Invalid API Key");
}

#[tokio::test]
async fn error_object_in_ok_response() {
    let (base, _) = spawn_stub(StatusCode::OK, json!({"error": {"message": "model not found"}})).await;

    let err = classifier_for(&base).classify("cough").await.unwrap_err();
    assert!(matches!(err, ClassificationError::Api(ref m) if m == "model not found"));
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let (base, _) = spawn_stub(StatusCode::OK, json!({"id": "x"})).await;

    let err = classifier_for(&base).classify("cough").await.unwrap_err();
    assert!(matches!(err, ClassificationError::MalformedResponse(_)));
}

#[tokio::test]
async fn null_content_is_empty_response() {
    let (base, _) = spawn_stub(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": null}, "finish_reason": "length"}]}),
    )
    .await;

    let err = classifier_for(&base).classify("cough").await.unwrap_err();
    assert!(matches!(err, ClassificationError::EmptyResponse));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = classifier_for(&format!("http://{addr}/v1"))
        .classify("cough")
        .await
        .unwrap_err();
    assert!(matches!(err, ClassificationError::Request(_)));
    assert!(err.as_assessment().starts_with("Error: request failed:"));
}

#[tokio::test]
async fn chat_returns_first_choice_content() {
    let (base, seen) = spawn_stub(StatusCode::OK, reply("Triage Level: 4 - Minor sprain")).await;
    let config = TriageConfig::new("gsk_test").with_api_base_url(&base);
    let client = ChatClient::new(&config).unwrap();

    let content = client
        .chat(&ChatRequest {
            model: client.model().to_string(),
            messages: vec![Message::user("twisted ankle")],
            temperature: triage_rs::CONSOLE_TEMPERATURE,
        })
        .await
        .unwrap();

    assert_eq!(content.as_deref(), Some("Triage Level: 4 - Minor sprain"));
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].1["messages"][0]["role"], "user");
    assert_eq!(seen[0].1["messages"].as_array().unwrap().len(), 1);
}
