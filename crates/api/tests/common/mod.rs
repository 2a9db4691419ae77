//! Shared fixtures for API integration tests.
//!
//! Builds the application through the same [`build_app_router`] the binary
//! uses, with fake payment and media adapters swapped in. The fake gateway
//! verifies callback signatures with the real HMAC path, so webhook tests
//! exercise production verification byte for byte.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::Value;
use skillmarket_api::auth::jwt::{generate_access_token, JwtConfig};
use skillmarket_api::config::ServerConfig;
use skillmarket_api::router::build_app_router;
use skillmarket_api::state::AppState;
use skillmarket_core::content::{Chapter, Lecture};
use skillmarket_core::signing;
use skillmarket_db::models::course::{Course, CreateCourse};
use skillmarket_db::models::user::{CreateUser, User};
use skillmarket_db::repositories::{CourseRepo, UserRepo};
use skillmarket_media::{MediaError, MediaHost, UploadedMedia};
use skillmarket_payments::{
    verify_signed_callback, CallbackEvent, CheckoutSession, CreateSession, PaymentError,
    PaymentGateway,
};
use sqlx::types::Json as SqlJson;
use sqlx::PgPool;
use tower::ServiceExt;

/// Shared secret the fake gateway verifies callbacks with.
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        payment_currency: "usd".to_string(),
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// In-memory payment gateway. Records every created session and verifies
/// callbacks against [`WEBHOOK_SECRET`] using the shared verification path.
#[derive(Default)]
pub struct FakePaymentGateway {
    pub sessions: Mutex<Vec<CreateSession>>,
    /// When set, `create_session` fails with a gateway rejection.
    pub fail_create: bool,
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_session(&self, req: &CreateSession) -> Result<CheckoutSession, PaymentError> {
        if self.fail_create {
            return Err(PaymentError::HttpStatus(503));
        }
        self.sessions.lock().unwrap().push(req.clone());
        Ok(CheckoutSession {
            session_id: format!("sess_{}", req.correlation_id),
            url: format!("https://gateway.test/checkout/{}", req.correlation_id),
        })
    }

    fn verify_callback(
        &self,
        raw_payload: &[u8],
        signature: &str,
    ) -> Result<CallbackEvent, PaymentError> {
        verify_signed_callback(WEBHOOK_SECRET, raw_payload, signature)
    }
}

/// In-memory media host. Echoes a deterministic URL, or fails when asked.
#[derive(Default)]
pub struct FakeMediaHost {
    pub fail: bool,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedMedia, MediaError> {
        if self.fail {
            return Err(MediaError::HttpStatus(500));
        }
        Ok(UploadedMedia {
            url: format!("https://media.test/{filename}"),
        })
    }
}

/// Build the application with default fakes.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        Arc::new(FakePaymentGateway::default()),
        Arc::new(FakeMediaHost::default()),
    )
}

/// Build the application with caller-supplied adapters, through the same
/// router builder production uses.
pub fn build_test_app_with(
    pool: PgPool,
    gateway: Arc<FakePaymentGateway>,
    media: Arc<FakeMediaHost>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway,
        media,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with a unique email derived from `tag`.
pub async fn create_user(pool: &PgPool, tag: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: format!("User {tag}"),
            email: format!("{tag}@test.example"),
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
            image_url: None,
        },
    )
    .await
    .expect("user insert should succeed")
}

/// Two-chapter content with lectures `l1` (free preview), `l2`, `l3`.
pub fn sample_content() -> Vec<Chapter> {
    vec![
        Chapter {
            chapter_id: "c1".to_string(),
            chapter_order: 1,
            chapter_title: "Getting Started".to_string(),
            chapter_content: vec![
                Lecture {
                    lecture_id: "l1".to_string(),
                    lecture_title: "Introduction".to_string(),
                    lecture_duration: 300,
                    lecture_url: "https://media.test/l1.mp4".to_string(),
                    is_preview_free: true,
                    lecture_order: 1,
                },
                Lecture {
                    lecture_id: "l2".to_string(),
                    lecture_title: "Setup".to_string(),
                    lecture_duration: 600,
                    lecture_url: "https://media.test/l2.mp4".to_string(),
                    is_preview_free: false,
                    lecture_order: 2,
                },
            ],
        },
        Chapter {
            chapter_id: "c2".to_string(),
            chapter_order: 2,
            chapter_title: "Deep Dive".to_string(),
            chapter_content: vec![Lecture {
                lecture_id: "l3".to_string(),
                lecture_title: "Internals".to_string(),
                lecture_duration: 900,
                lecture_url: "https://media.test/l3.mp4".to_string(),
                is_preview_free: false,
                lecture_order: 1,
            }],
        },
    ]
}

/// Insert a course priced at 100.00 with a 20% discount (charged: 80.00).
pub async fn create_course(pool: &PgPool, educator_id: i64, published: bool) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            educator_id,
            title: "Rust 101".to_string(),
            description: "A test course".to_string(),
            thumbnail_url: Some("https://media.test/thumb.png".to_string()),
            price: dec!(100.00),
            discount: 20,
            is_published: published,
            content: SqlJson(sample_content()),
        },
    )
    .await
    .expect("course insert should succeed")
}

/// Generate a Bearer token for the given user with the test JWT secret.
pub fn auth_token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_jwt_config())
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: &Router, path: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: &Router, path: &str, token: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Send a POST request with a JSON body and optional Bearer token.
pub async fn post_json(
    app: &Router,
    path: &str,
    body: Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Post a signed webhook callback: signs `payload` with [`WEBHOOK_SECRET`]
/// unless an explicit signature is supplied.
pub async fn post_callback(
    app: &Router,
    payload: &str,
    signature: Option<&str>,
) -> Response<Body> {
    let sig = match signature {
        Some(s) => s.to_string(),
        None => signing::compute_signature(WEBHOOK_SECRET, payload.as_bytes()),
    };
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/webhooks/payments")
                .header("content-type", "application/json")
                .header("x-gateway-signature", sig)
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Assert status and return the decoded body in one step.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
