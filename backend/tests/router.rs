use axum::body::Body;
use axum::http::{Request, StatusCode};
use backend::config::ServiceConfig;
use backend::dbs::{Database, LocalDatabase};
use backend::service::CharacterService;
use serde_json::{Value, json};
use shared::models::{Character, ErrorBody, ErrorKind, SearchRequest};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DESCRIPTION: &str = "Zeus was born to Cronus and Rhea, led the Olympians against the Titans, and his eagle and thunderbolt symbolize supreme authority.";

async fn app(server: &MockServer, api_key: Option<&str>) -> (axum::Router, Arc<LocalDatabase>) {
    let db = Arc::new(LocalDatabase::new("sqlite::memory:").await.unwrap());
    let config = ServiceConfig {
        openai_api_key: api_key.map(str::to_string),
        openai_api_base: server.uri(),
        generation_timeout: Duration::from_secs(5),
        probe_timeout: Duration::from_secs(1),
        ..Default::default()
    };
    let service = CharacterService::from_config(&config, db.clone()).unwrap();
    (backend::init(axum::Router::new(), service), db)
}

async fn mount_generators(server: &MockServer, image_url: &str, image_calls: u64) {
    mount_text(server).await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1_700_000_000,
            "data": [{ "url": image_url }]
        })))
        .expect(image_calls)
        .mount(server)
        .await;
}

async fn post_json(app: &axum::Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/character")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn search(app: &axum::Router, term: &str) -> (StatusCode, Value) {
    let body = serde_json::to_string(&SearchRequest {
        search: term.to_string(),
    })
    .unwrap();
    post_json(app, body).await
}

#[tokio::test]
async fn first_search_generates_and_second_is_served_from_store() {
    let server = MockServer::start().await;
    let image_url = format!("{}/assets/zeus.png", server.uri());
    mount_generators(&server, &image_url, 1).await;
    Mock::given(method("HEAD"))
        .and(path("/assets/zeus.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let (app, db) = app(&server, Some("sk-test")).await;

    let (status, body) = search(&app, "Zeus").await;
    assert_eq!(status, StatusCode::OK);
    let created: Character = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(created.name, "zeus");
    assert_eq!(created.description, DESCRIPTION);
    assert_eq!(body["imageUrl"], image_url.as_str());
    assert_eq!(db.find_by_name("zeus").await.unwrap(), Some(created));

    let (status, again) = search(&app, "zeus").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, body);
}

#[tokio::test]
async fn expired_image_is_replaced_in_place() {
    let server = MockServer::start().await;
    let fresh_url = format!("{}/assets/fresh.png", server.uri());
    Mock::given(method("HEAD"))
        .and(path("/assets/expired.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1_700_000_000,
            "data": [{ "url": fresh_url }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let (app, db) = app(&server, Some("sk-test")).await;
    let stored = db
        .create(Character::new(
            "zeus".to_string(),
            DESCRIPTION.to_string(),
            format!("{}/assets/expired.png", server.uri()),
        ))
        .await
        .unwrap();

    let (status, body) = search(&app, "Zeus").await;

    assert_eq!(status, StatusCode::OK);
    let updated: Character = serde_json::from_value(body).unwrap();
    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.description, stored.description);
    assert_eq!(updated.image_url, fresh_url);
}

async fn mount_text(server: &MockServer) {
    let content = json!({ "name": "Zeus", "description": DESCRIPTION }).to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop",
                "logprobs": null
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn image_api_outage_is_an_unexpected_server_error() {
    let server = MockServer::start().await;
    mount_text(&server).await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    let (app, db) = app(&server, Some("sk-test")).await;

    let (status, value) = search(&app, "Zeus").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = serde_json::from_value(value).unwrap();
    assert_eq!(error.kind, ErrorKind::Unexpected);
    assert_eq!(db.find_by_name("zeus").await.unwrap(), None);
}

#[tokio::test]
async fn image_reply_without_url_is_a_generation_failure() {
    let server = MockServer::start().await;
    mount_text(&server).await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "created": 1_700_000_000, "data": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (app, db) = app(&server, Some("sk-test")).await;

    let (status, value) = search(&app, "Zeus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_value(value).unwrap();
    assert_eq!(error.kind, ErrorKind::GenerationFailed);
    assert_eq!(db.find_by_name("zeus").await.unwrap(), None);
}

#[tokio::test]
async fn invalid_bodies_are_client_input_errors() {
    let server = MockServer::start().await;
    let (app, _db) = app(&server, Some("sk-test")).await;

    for body in [
        json!({ "search": 42 }).to_string(),
        json!({ "search": "" }).to_string(),
        json!({ "query": "zeus" }).to_string(),
        "not json".to_string(),
    ] {
        let (status, value) = post_json(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorBody = serde_json::from_value(value).unwrap();
        assert_eq!(error.kind, ErrorKind::ClientInput);
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_character_without_key_is_a_configuration_error() {
    let server = MockServer::start().await;
    let (app, _db) = app(&server, None).await;

    let (status, value) = search(&app, "Hera").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorBody = serde_json::from_value(value).unwrap();
    assert_eq!(error.kind, ErrorKind::ConfigurationMissing);
}

#[tokio::test]
async fn health_route_answers() {
    let server = MockServer::start().await;
    let (app, _db) = app(&server, None).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
