#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use jsonwebtoken::Algorithm;
use serde_json::json;
use std::sync::Arc;

use taskgate::auth::AuthResponse;
use taskgate::config::JwtSettings;
use taskgate::store::{InMemoryTaskStore, InMemoryUserStore};
use taskgate::{AppState, Config};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt: JwtSettings {
            secret: TEST_SECRET.to_string(),
            algorithm: Algorithm::HS256,
        },
        bcrypt_cost: 4,
    }
}

/// Application state over in-memory stores, plus a handle on the user store
/// so tests can inspect or delete accounts directly.
pub struct TestContext {
    pub state: web::Data<AppState>,
    pub users: Arc<InMemoryUserStore>,
}

pub fn test_context() -> TestContext {
    let users = Arc::new(InMemoryUserStore::new());
    let state = AppState::new(
        &test_config(),
        users.clone(),
        Arc::new(InMemoryTaskStore::new()),
    )
    .expect("test state");

    TestContext {
        state: web::Data::new(state),
        users,
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        StatusCode::CREATED,
        "registration of {} failed",
        email
    );
    test::read_body_json(resp).await
}
