//! End-to-end tests for the lesson-material generator, with a mock Gemini server.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use lessonflow_core::lesson::{LessonPlanner, DEFAULT_SYSTEM_INSTRUCTION};
use lessonflow_core::ports::StructuredGenerationService;
use serde_json::{json, Value};
use tower::ServiceExt;
use web_lib::adapters::GeminiAdapter;
use web_lib::web::{materials_router, pages::Pages, MaterialsState};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

fn router_for(server: Option<&MockServer>) -> Router {
    let backend = server.map(|server| {
        Arc::new(GeminiAdapter::new(
            reqwest::Client::new(),
            server.uri(),
            "test-key".to_string(),
            "gemini-2.5-flash".to_string(),
        )) as Arc<dyn StructuredGenerationService>
    });
    materials_router(Arc::new(MaterialsState {
        planner: LessonPlanner::new(backend, DEFAULT_SYSTEM_INSTRUCTION),
        pages: Arc::new(Pages::new().unwrap()),
    }))
}

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

async fn post_generate(app: Router, body: Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn index_serves_the_form() {
    let resp = router_for(None)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains(r#"id="generateForm""#));
}

#[tokio::test]
async fn generates_materials_from_the_model_reply() {
    let server = MockServer::start().await;
    let materials = json!({
        "plan": "1. Intro to fractions",
        "flashcards": [{ "q": "What is 1/2?", "a": "One half" }],
        "test": [{
            "q": "1/2 + 1/2 = 1?",
            "type": "tf",
            "answer": "true",
            "explanation": "Two halves"
        }],
        "trainer": [{
            "level": "L1",
            "task": "Add 1/3 and 1/3",
            "answer": "2/3",
            "explain": "Same denominator"
        }]
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_string_contains("Topic: Fractions"))
        .and(body_string_contains("Difficulty level: basic"))
        .respond_with(gemini_reply(&materials.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let resp = post_generate(
        router_for(Some(&server)),
        json!({ "topic": " Fractions ", "class": "5", "goal": "Addition" }),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, materials);
}

#[tokio::test]
async fn invalid_model_json_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(gemini_reply("Sorry, here is your plan: ..."))
        .mount(&server)
        .await;

    let resp = post_generate(router_for(Some(&server)), json!({ "topic": "Fractions" })).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("invalid JSON"), "{error}");
}

#[tokio::test]
async fn gemini_api_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "Permission denied.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let resp = post_generate(router_for(Some(&server)), json!({ "topic": "Fractions" })).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Gemini API error:"), "{error}");
    assert!(error.contains("Permission denied."), "{error}");
}

#[tokio::test]
async fn missing_topic_or_body_is_a_bad_request() {
    let server = MockServer::start().await;

    let blank =
        post_generate(router_for(Some(&server)), json!({ "topic": "  ", "class": "5" })).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(blank).await["error"], "Topic is required");

    let not_json = router_for(Some(&server))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .body(Body::from("topic=Fractions"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(not_json).await["error"], "Missing JSON data");

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_api_key_is_reported_per_request() {
    let resp = post_generate(router_for(None), json!({ "topic": "Fractions" })).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(resp).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("GEMINI_API_KEY"), "{error}");
}
