//! HTTP tests driving the full router over the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use class_scheduler::api::{create_router, AppState};
use class_scheduler::config::{Config, HashCost};
use class_scheduler::infra::MemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let mut config = Config::with_secret("test-secret-key-for-testing-only-32chars");
        config.hash_cost = HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let state = AppState::from_store(Arc::new(MemoryStore::new()), config);
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Register and return (token, user id)
    async fn register(&self, email: &str, role: &str) -> (String, Uuid) {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({"name": "User", "email": email, "password": "secret1", "role": role})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let token = body["token"].as_str().unwrap().to_string();
        let user_id = self.state.auth_service.verify_token(&token).unwrap().user_id;
        (token, user_id)
    }

    async fn create_class(&self, token: &str, teacher: Uuid) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/classes/create",
                Some(token),
                Some(json!({"title": "Intro to Rust", "teacher": teacher, "timeSlot": "Mon 09:00"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["students"], json!([]));
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_with_token() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "A", "email": "a@x.com", "password": "secret1", "role": "student"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
}

#[tokio::test]
async fn test_register_duplicate_is_bad_request() {
    let app = TestApp::new();
    app.register("a@x.com", "student").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "B", "email": "a@x.com", "password": "other", "role": "teacher"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_IDENTITY");
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_register_empty_password_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "A", "email": "a@x.com", "password": ""})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_unknown_role_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "A", "email": "a@x.com", "password": "x", "role": "janitor"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_and_uniform_failures() {
    let app = TestApp::new();
    app.register("a@x.com", "student").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (wrong_status, wrong_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "a@x.com", "password": "wrong"})),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ghost@x.com", "password": "secret1"})),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid credentials");
}

// =============================================================================
// Auth gate
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/classes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send(Method::GET, "/classes", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let uri = format!("/classes/{}/enroll", Uuid::new_v4());
    let (status, _) = app.send(Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Classes & enrollment
// =============================================================================

#[tokio::test]
async fn test_enroll_flow_then_already_enrolled() {
    let app = TestApp::new();
    let (teacher_token, teacher_id) = app.register("t@x.com", "teacher").await;
    let (student_token, _) = app.register("a@x.com", "student").await;
    let class_id = app.create_class(&teacher_token, teacher_id).await;
    let uri = format!("/classes/{}/enroll", class_id);

    let (status, body) = app.send(Method::POST, &uri, Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Enrolled successfully");

    let (status, body) = app.send(Method::POST, &uri, Some(&student_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_ENROLLED");
}

#[tokio::test]
async fn test_enroll_ignores_identity_in_body() {
    let app = TestApp::new();
    let (teacher_token, teacher_id) = app.register("t@x.com", "teacher").await;
    let (student_token, student_id) = app.register("a@x.com", "student").await;
    let (_, victim_id) = app.register("v@x.com", "student").await;
    let class_id = app.create_class(&teacher_token, teacher_id).await;

    let uri = format!("/classes/{}/enroll", class_id);
    let (status, _) = app
        .send(
            Method::POST,
            &uri,
            Some(&student_token),
            Some(json!({"userId": victim_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, classes) = app.send(Method::GET, "/classes", Some(&teacher_token), None).await;
    let students = classes[0]["students"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["id"], json!(student_id));
}

#[tokio::test]
async fn test_enroll_unknown_or_malformed_class_is_not_found() {
    let app = TestApp::new();
    let (token, _) = app.register("a@x.com", "student").await;

    let uri = format!("/classes/{}/enroll", Uuid::new_v4());
    let (status, body) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = app
        .send(Method::POST, "/classes/not-an-id/enroll", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_classes_resolves_teacher_and_students() {
    let app = TestApp::new();
    let (teacher_token, teacher_id) = app.register("t@x.com", "teacher").await;
    let (student_token, _) = app.register("a@x.com", "student").await;
    let class_id = app.create_class(&teacher_token, teacher_id).await;
    app.send(
        Method::POST,
        &format!("/classes/{}/enroll", class_id),
        Some(&student_token),
        None,
    )
    .await;

    let (status, body) = app.send(Method::GET, "/classes", Some(&student_token), None).await;

    assert_eq!(status, StatusCode::OK);
    let class = &body[0];
    assert_eq!(class["title"], "Intro to Rust");
    assert_eq!(class["timeSlot"], "Mon 09:00");
    assert_eq!(class["teacher"]["email"], "t@x.com");
    assert_eq!(class["teacher"]["role"], "teacher");
    assert_eq!(class["students"][0]["email"], "a@x.com");
    assert!(class["students"][0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_create_class_validation() {
    let app = TestApp::new();
    let (token, teacher_id) = app.register("t@x.com", "teacher").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/classes/create",
            Some(&token),
            Some(json!({"title": "", "teacher": teacher_id, "timeSlot": "Mon"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            "/classes/create",
            Some(&token),
            Some(json!({"title": "Algebra", "teacher": Uuid::new_v4(), "timeSlot": "Mon"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Teacher not found");
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_health_reports_store() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
