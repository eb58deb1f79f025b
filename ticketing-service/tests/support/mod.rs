#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common_auth::{JwtConfig, TokenSigner};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use tower_http::cors::CorsLayer;

use ticketing_service::store::{Collection, Document, DocumentStore, MemoryStore};
use ticketing_service::{build_router, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "admin@amp.test";
pub const FAN_EMAIL: &str = "fan@amp.test";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    signer: TokenSigner,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = router_with_store(store.clone());
        Self {
            router,
            store,
            signer: TokenSigner::new(JwtConfig::new(SECRET)),
        }
    }

    /// App with one admin and one plain user already stored.
    pub async fn seeded() -> Self {
        let app = Self::new();
        app.seed_user(ADMIN_EMAIL, Some("admin")).await;
        app.seed_user(FAN_EMAIL, None).await;
        app
    }

    pub fn token_for(&self, email: &str) -> String {
        self.signer
            .issue(document(json!({ "email": email })))
            .expect("sign test token")
            .token
    }

    pub async fn seed_user(&self, email: &str, role: Option<&str>) -> String {
        let mut user = json!({ "email": email, "name": email });
        if let Some(role) = role {
            user["role"] = json!(role);
        }
        self.insert(Collection::Users, user).await
    }

    pub async fn insert(&self, collection: Collection, value: Value) -> String {
        self.store
            .insert_one(collection, document(value))
            .await
            .expect("seed document")
            .inserted_id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }
}

pub fn router_with_store(store: Arc<dyn DocumentStore>) -> Router {
    let state = AppState::new(store, JwtConfig::new(SECRET));
    build_router(state, CorsLayer::permissive())
}

pub fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Status plus body; bodies that are not JSON come back as a JSON string.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub const SOME_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";
