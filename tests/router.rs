//! End-to-end tests for the HTTP surface, driven through the full
//! middleware stack with an in-memory credential store.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use kredo::kredo::{
    router,
    service::CredentialService,
    store::{MemoryUserStore, NewUser, StoreError, UserRecord, UserStore},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// bcrypt's minimum cost factor; the crate keeps this constant private
const MIN_COST: u32 = 4;

fn app() -> Router {
    let store = Arc::new(MemoryUserStore::new());
    let service = Arc::new(CredentialService::new(store).with_cost(MIN_COST));
    router(service)
}

// Store double for an unreachable backend
struct UnreachableStore;

#[async_trait]
impl UserStore for UnreachableStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(StoreError::Unavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }

    async fn insert(&self, _user: NewUser) -> Result<String, StoreError> {
        Err(StoreError::Unavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }
}

fn unreachable_app() -> Router {
    let service =
        Arc::new(CredentialService::new(Arc::new(UnreachableStore)).with_cost(MIN_COST));
    router(service)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_says_hello() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({ "message": "Hello, World!" }));
}

#[tokio::test]
async fn test_health_reports_build_info() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("X-App"));

    let body = body_json(response.into_body()).await;
    assert_eq!(body["name"], "kredo");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_user_then_login() {
    let app = app();
    let credentials = json!({ "username": "alice", "password": "secret123" });

    let response = app
        .clone()
        .oneshot(post_json("/create_user", &credentials))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "User created");
    assert!(body["user_id"].as_str().is_some_and(|id| !id.is_empty()));

    let response = app
        .clone()
        .oneshot(post_json("/login", &credentials))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Authentication successful");
}

#[tokio::test]
async fn test_create_user_twice_is_rejected() {
    let app = app();
    let credentials = json!({ "username": "alice", "password": "secret123" });

    let response = app
        .clone()
        .oneshot(post_json("/create_user", &credentials))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json("/create_user", &credentials))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({ "detail": "User already exists" }));
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/create_user",
            &json!({ "username": "alice", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            &json!({ "username": "alice", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response.into_body()).await;
    assert_eq!(body, json!({ "detail": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/create_user",
            &json!({ "username": "alice", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let unknown = app
        .clone()
        .oneshot(post_json(
            "/login",
            &json!({ "username": "nobody", "password": "secret123" }),
        ))
        .await
        .unwrap();
    let mismatch = app
        .clone()
        .oneshot(post_json(
            "/login",
            &json!({ "username": "alice", "password": "wrong" }),
        ))
        .await
        .unwrap();

    // identical status and body, no user-enumeration signal
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(mismatch.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(unknown.into_body()).await,
        body_json(mismatch.into_body()).await
    );
}

#[tokio::test]
async fn test_missing_payload_is_bad_request() {
    for uri in ["/create_user", "/login"] {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({ "detail": "Missing payload" }));
    }
}

#[tokio::test]
async fn test_empty_fields_are_bad_request() {
    for payload in [
        json!({ "username": "", "password": "secret123" }),
        json!({ "username": "alice", "password": "" }),
    ] {
        let response = app()
            .oneshot(post_json("/create_user", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_store_unreachable_is_internal_server_error() {
    let credentials = json!({ "username": "alice", "password": "secret123" });

    for uri in ["/create_user", "/login"] {
        let response = unreachable_app()
            .oneshot(post_json(uri, &credentials))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response.into_body()).await;
        assert_eq!(body, json!({ "detail": "Internal server error" }));
    }
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
