#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ratingsapp::router::init_router;
use ratingsapp::state::AppState;
use ratingsapp_auth::{TokenKind, create_token};
use ratingsapp_config::JwtConfig;
use ratingsapp_core::password::hash_password_with_cost;
use ratingsapp_db::{MemoryStore, Repositories, UserRepository};
use ratingsapp_models::User;

pub const TEST_SECRET: &str = "integration-test-secret-that-is-long-enough";
pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const TEST_PASSWORD: &str = "testpass123";
/// Cheap bcrypt cost so tests stay fast.
pub const TEST_HASH_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub repositories: Repositories,
    pub jwt_config: JwtConfig,
}

/// Fresh app on seeded in-memory storage. The super-admin logs in with
/// [`TEST_PASSWORD`].
pub fn setup_test_app() -> TestApp {
    let admin_hash = hash_password_with_cost(TEST_PASSWORD, TEST_HASH_COST).unwrap();
    let repositories = Repositories::memory(MemoryStore::seeded(admin_hash));
    let jwt_config = JwtConfig::new(TEST_SECRET);
    let state = AppState::with_hash_cost(repositories.clone(), jwt_config.clone(), TEST_HASH_COST);

    TestApp {
        router: init_router(state),
        repositories,
        jwt_config,
    }
}

impl TestApp {
    /// Inserts a principal that logs in with [`TEST_PASSWORD`].
    pub async fn create_test_user(&self, email: &str, role_id: i64) -> User {
        let mut user = User {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: hash_password_with_cost(TEST_PASSWORD, TEST_HASH_COST).unwrap(),
            role_id,
            ..Default::default()
        };
        self.repositories.users.create(&mut user).await.unwrap();
        user
    }

    pub fn access_token(&self, user: &User) -> String {
        create_token(user.id, user.role_id, TokenKind::Access, &self.jwt_config).unwrap()
    }

    pub fn refresh_token(&self, user: &User) -> String {
        create_token(user.id, user.role_id, TokenKind::Refresh, &self.jwt_config).unwrap()
    }

    pub async fn admin(&self) -> User {
        self.repositories.users.by_id(1).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
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

pub fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}
