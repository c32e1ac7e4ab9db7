//! Shared helpers for the integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use wellness_guide_server::{open_database, router, AppState, Config, Db};

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Create a test configuration
pub fn test_config(database_url: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: database_url.to_string(),
        database_max_connections: 5,
        allowed_origins: vec!["http://localhost:3000".to_string()],
        environment: "test".to_string(),
        secret_key: TEST_SECRET.to_string(),
        access_token_expire_minutes: 30,
        // Minimum bcrypt cost keeps the suite fast
        bcrypt_cost: 4,
    }
}

/// A migrated database in a temporary directory plus the state built on it
///
/// The directory is removed when this is dropped, so keep it alive for the
/// whole test.
pub struct TestContext {
    _temp_dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let database_url = format!("sqlite://{}", db_path.display());

        let pool = open_database(&database_url, 5)
            .await
            .expect("Failed to create test database");
        let state = AppState::new(pool, test_config(&database_url));

        Self {
            _temp_dir: temp_dir,
            state,
        }
    }

    pub fn pool(&self) -> &Db {
        &self.state.pool
    }

    /// Create a test app router
    pub fn app(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    /// Sign up `username` and return the created user
    pub async fn signup(&self, username: &str) -> Value {
        let body = json!({
            "email": format!("{username}@example.com"),
            "username": username,
            "full_name": "Test User",
            "password": TEST_PASSWORD,
        });
        let (status, user) = self
            .send(json_request("POST", "/api/v1/auth/signup", None, &body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {user}");
        user
    }

    pub async fn login(&self, username: &str) -> String {
        let body = json!({ "username": username, "password": TEST_PASSWORD });
        let (status, response) = self
            .send(json_request("POST", "/api/v1/auth/login", None, &body))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {response}");
        response["access_token"].as_str().unwrap().to_string()
    }

    /// Sign up and log in; returns the bearer token
    pub async fn register(&self, username: &str) -> String {
        self.signup(username).await;
        self.login(username).await
    }

    pub async fn create_routine(&self, token: &str, title: &str) -> Value {
        let body = json!({
            "title": title,
            "goal": "flexibility",
            "description": "Gentle stretches",
            "yogasana_ids": "[\"tadasana\",\"vrikshasana\"]",
            "duration_minutes": 20,
        });
        let (status, routine) = self
            .send(json_request("POST", "/api/v1/routines", Some(token), &body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create routine failed: {routine}");
        routine
    }
}

/// Parse response body as JSON; an empty body reads as `null`
pub async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a request with a JSON body and an optional bearer token
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Create a body-less request with an optional bearer token
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
