// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fitto_tracker::config::{Config, StorageBackend};
use fitto_tracker::db::Database;
use fitto_tracker::routes::create_router;
use fitto_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the Firestore emulator.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let config = Config {
        storage: StorageBackend::Firestore,
        gcp_project_id: Some("test-project".to_string()),
        ..Config::test_default()
    };
    Database::connect(&config)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Build the router over `db` with the test configuration.
#[allow(dead_code)]
pub fn create_app_with_db(db: Database) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), db));
    (create_router(state.clone()), state)
}

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_app_with_db(Database::new_in_memory())
}

/// Create a test app whose storage always fails.
#[allow(dead_code)]
pub fn create_offline_app() -> (Router, Arc<AppState>) {
    create_app_with_db(Database::new_mock())
}

/// Create a test JWT token with the claims the middleware expects.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8], ttl_secs: i64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        username: String,
        #[serde(rename = "setupComplete")]
        setup_complete: bool,
        exp: i64,
        iat: i64,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        username: "test-user".to_string(),
        setup_complete: false,
        exp: now + ttl_secs,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Send a request and return the status and parsed JSON body
/// (`Value::Null` for an empty body).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
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
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register `username` and log in, returning `(user_id, token)`.
#[allow(dead_code)]
pub async fn register_and_login(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let user_id = body["userId"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    let token = body["token"].as_str().unwrap().to_string();

    (user_id, token)
}

/// A complete setup body for an 80 kg, 180 cm, 30 year old.
#[allow(dead_code)]
pub fn setup_body(gender: &str, activity_level: &str, goal: &str, rate: Option<f64>) -> Value {
    let mut body = serde_json::json!({
        "age": 30,
        "height": 180,
        "weight": 80,
        "gender": gender,
        "activityLevel": activity_level,
        "goal": goal,
    });
    if let Some(rate) = rate {
        body["rate"] = serde_json::json!(rate);
    }
    body
}
