//! Middleware tests
//!
//! Tests for the AdminAuth bearer-token guard. These tests swap the global
//! config, so they serialize on a lock instead of racing each other.

use actix_web::http::{Method, StatusCode};
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpResponse, web};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

use origintrack::api::middleware::AdminAuth;
use origintrack::config::{StaticConfig, set_config};

// =============================================================================
// Test Setup
// =============================================================================

static CONFIG_LOCK: Mutex<()> = Mutex::new(());

/// Install a config with the given admin token and hold the lock for the
/// duration of the test. A poisoned lock just means an earlier test
/// panicked; the guard is still usable.
fn set_admin_token(token: &str) -> MutexGuard<'static, ()> {
    let guard = CONFIG_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let mut config = StaticConfig::default();
    config.api.admin_token = token.to_string();
    set_config(config);
    guard
}

/// Simple handler for testing middleware
async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

macro_rules! guarded_app {
    () => {{
        test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AdminAuth)
                    .route("/ping", web::get().to(ok_handler))
                    .route("/ping", web::method(Method::OPTIONS).to(ok_handler)),
            ),
        )
        .await
    }};
}

// =============================================================================
// AdminAuth Tests
// =============================================================================

#[tokio::test]
async fn test_empty_token_disables_admin_routes() {
    let _guard = set_admin_token("");
    let app = guarded_app!();

    let req = TestRequest::get().uri("/admin/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"Not Found");
}

#[tokio::test]
async fn test_empty_token_hides_options_too() {
    let _guard = set_admin_token("");
    let app = guarded_app!();

    // The disabled check comes before preflight handling; a probe must not
    // be able to tell the admin surface exists
    let req = TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/admin/ping")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_valid_bearer_token_passes() {
    let _guard = set_admin_token("test-secret-token");
    let app = guarded_app!();

    let req = TestRequest::get()
        .uri("/admin/ping")
        .insert_header(("Authorization", "Bearer test-secret-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_missing_header_rejected() {
    let _guard = set_admin_token("test-secret-token");
    let app = guarded_app!();

    let req = TestRequest::get().uri("/admin/ping").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn test_invalid_bearer_token_rejected() {
    let _guard = set_admin_token("test-secret-token");
    let app = guarded_app!();

    let req = TestRequest::get()
        .uri("/admin/ping")
        .insert_header(("Authorization", "Bearer wrong-token-here"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_auth_schemes_rejected() {
    let _guard = set_admin_token("test-secret-token");
    let app = guarded_app!();

    // Only the exact "Bearer " prefix is accepted
    for header in [
        "Basic dXNlcjpwYXNz",
        "bearer test-secret-token",
        "Bearertest-secret-token",
        "test-secret-token",
    ] {
        let req = TestRequest::get()
            .uri("/admin/ping")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header: {header}");
    }
}

#[tokio::test]
async fn test_options_preflight_passes_without_token() {
    let _guard = set_admin_token("test-secret-token");
    let app = guarded_app!();

    let req = TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/admin/ping")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
