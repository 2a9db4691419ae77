//! End-to-end tests for the purchase -> settlement -> enrollment flow.
//!
//! The fake gateway records checkout sessions and verifies callback
//! signatures with the production HMAC path, so these tests cover the
//! whole reconciliation surface: amount computation, the CAS settlement,
//! idempotent redelivery, and rejection of unverifiable callbacks.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use common::{expect_status, post_callback, FakeMediaHost, FakePaymentGateway};
use rust_decimal_macros::dec;
use skillmarket_db::models::purchase::PurchaseStatus;
use skillmarket_db::repositories::{CourseRepo, PurchaseRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// POST the purchase route with an Origin header, as a browser would.
async fn start_purchase(app: &Router, course_id: i64, token: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/users/me/purchases/{course_id}"))
                .header("authorization", format!("Bearer {token}"))
                .header("origin", "https://shop.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purchase_records_discounted_amount_and_opens_session(pool: PgPool) {
    let gateway = Arc::new(FakePaymentGateway::default());
    let app = common::build_test_app_with(
        pool.clone(),
        Arc::clone(&gateway),
        Arc::new(FakeMediaHost::default()),
    );

    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;

    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();
    assert_eq!(
        body["data"]["session_url"],
        format!("https://gateway.test/checkout/{purchase_id}")
    );

    // 100.00 with 20% off.
    let purchase = PurchaseRepo::find_by_id(&pool, purchase_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.amount, dec!(80.00));
    assert_eq!(purchase.status, PurchaseStatus::Pending);

    let sessions = gateway.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].amount, dec!(80.00));
    assert_eq!(sessions[0].currency, "usd");
    assert_eq!(sessions[0].correlation_id, purchase_id);
    assert_eq!(
        sessions[0].success_url,
        "https://shop.test/loading/my-enrollments"
    );
    assert_eq!(sessions[0].cancel_url, "https://shop.test/");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn purchase_without_origin_is_a_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/users/me/purchases/{}", course.id))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unpublished_course_cannot_be_purchased(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, false).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn settled_callback_completes_purchase_and_enrolls_both_sides(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();

    let payload = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "settled"}}"#);
    let callback = post_callback(&app, &payload, None).await;
    assert_eq!(callback.status(), StatusCode::OK);

    let purchase = PurchaseRepo::find_by_id(&pool, purchase_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Completed);

    let user = UserRepo::find_by_id(&pool, student.id).await.unwrap().unwrap();
    assert_eq!(user.enrolled_courses, vec![course.id]);

    let course = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert_eq!(course.enrolled_students, vec![student.id]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn redelivered_settlement_is_accepted_without_duplicates(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();

    let payload = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "settled"}}"#);
    let first = post_callback(&app, &payload, None).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Same callback again: still success, still exactly one entry per side.
    let second = post_callback(&app, &payload, None).await;
    assert_eq!(second.status(), StatusCode::OK);

    let user = UserRepo::find_by_id(&pool, student.id).await.unwrap().unwrap();
    assert_eq!(user.enrolled_courses, vec![course.id]);

    let course = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert_eq!(course.enrolled_students, vec![student.id]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_signature_is_rejected_and_purchase_stays_pending(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();

    let payload = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "settled"}}"#);
    let callback = post_callback(&app, &payload, Some("deadbeef")).await;
    let error = expect_status(callback, StatusCode::UNAUTHORIZED).await;
    assert_eq!(error["code"], "AUTHENTICATION_FAILED");

    let purchase = PurchaseRepo::find_by_id(&pool, purchase_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Pending);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_signature_header_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/webhooks/payments")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"correlation_id": 1, "outcome": "settled"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_correlation_id_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let callback = post_callback(
        &app,
        r#"{"correlation_id": 999999, "outcome": "settled"}"#,
        None,
    )
    .await;
    assert_eq!(callback.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelled_callback_fails_purchase_without_enrollment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();

    let payload = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "cancelled"}}"#);
    let callback = post_callback(&app, &payload, None).await;
    assert_eq!(callback.status(), StatusCode::OK);

    let purchase = PurchaseRepo::find_by_id(&pool, purchase_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Failed);

    let user = UserRepo::find_by_id(&pool, student.id).await.unwrap().unwrap();
    assert!(user.enrolled_courses.is_empty());

    // Cancellation redelivery is accepted silently.
    let again = post_callback(&app, &payload, None).await;
    assert_eq!(again.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn settlement_after_cancellation_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let purchase_id = body["data"]["purchase_id"].as_i64().unwrap();

    let cancel = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "cancelled"}}"#);
    post_callback(&app, &cancel, None).await;

    let settle = format!(r#"{{"correlation_id": {purchase_id}, "outcome": "settled"}}"#);
    let callback = post_callback(&app, &settle, None).await;
    let error = expect_status(callback, StatusCode::CONFLICT).await;
    assert_eq!(error["code"], "CONFLICT");

    let purchase = PurchaseRepo::find_by_id(&pool, purchase_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(purchase.status, PurchaseStatus::Failed);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn gateway_failure_leaves_pending_purchase(pool: PgPool) {
    let gateway = Arc::new(FakePaymentGateway {
        fail_create: true,
        ..Default::default()
    });
    let app = common::build_test_app_with(
        pool.clone(),
        Arc::clone(&gateway),
        Arc::new(FakeMediaHost::default()),
    );

    let educator = common::create_user(&pool, "educator").await;
    let student = common::create_user(&pool, "student").await;
    let course = common::create_course(&pool, educator.id, true).await;
    let token = common::auth_token(student.id, &student.role);

    let response = start_purchase(&app, course.id, &token).await;
    let error = expect_status(response, StatusCode::BAD_GATEWAY).await;
    assert_eq!(error["code"], "UPSTREAM_ERROR");

    // The pending ledger row exists but never settles; nobody was enrolled.
    let user = UserRepo::find_by_id(&pool, student.id).await.unwrap().unwrap();
    assert!(user.enrolled_courses.is_empty());
}
