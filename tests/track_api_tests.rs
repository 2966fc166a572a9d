//! Tracking route tests
//!
//! Tests for the public hit route and the registration hook.
//! This is the core attribution path: hit → cookie → registration.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::Utc;
use serde_json::json;

use origintrack::api::services::admin::ApiResponse;
use origintrack::api::services::track_routes;
use origintrack::config::init_config;
use origintrack::services::RegistrationService;
use origintrack::session::{AttributionToken, TokenCookieBuilder};
use origintrack::storage::{Origin, TrackingStorage};

use std::sync::Once;
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();
static TEST_DIR: std::sync::OnceLock<TempDir> = std::sync::OnceLock::new();
static ENV_INIT: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();
static STORAGE: std::sync::OnceLock<Arc<TrackingStorage>> = std::sync::OnceLock::new();
static RECORDER: std::sync::OnceLock<Arc<RegistrationService>> = std::sync::OnceLock::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn init_test_env() {
    init_static_config();

    ENV_INIT
        .get_or_init(|| async {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join("track_test.db");
            let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

            let storage = Arc::new(
                TrackingStorage::new(&db_url, "sqlite")
                    .await
                    .expect("Failed to create storage"),
            );
            let recorder = Arc::new(RegistrationService::new(storage.clone()));

            let _ = STORAGE.set(storage);
            let _ = RECORDER.set(recorder);
            let _ = TEST_DIR.set(temp_dir);
        })
        .await;
}

fn get_storage() -> Arc<TrackingStorage> {
    STORAGE.get().expect("Storage not initialized").clone()
}

fn get_recorder() -> Arc<RegistrationService> {
    RECORDER.get().expect("Recorder not initialized").clone()
}

/// Insert an origin straight into the store
async fn seed_origin(
    code: &str,
    track_registrations: bool,
    querystring_parameters: Option<&str>,
    redirect_to: Option<&str>,
) {
    get_storage()
        .insert_origin(&Origin {
            code: code.to_string(),
            title: format!("Campaign {}", code),
            description: None,
            track_registrations,
            querystring_parameters: querystring_parameters.map(str::to_string),
            redirect_to: redirect_to.map(str::to_string),
            number_of_registrations: 0,
            origin_group_id: None,
            created_at: Utc::now(),
        })
        .await
        .expect("Failed to seed origin");
}

/// Create a test app mounted the way the server mounts it
macro_rules! track_app {
    () => {{
        let storage = get_storage();
        let recorder = get_recorder();
        test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(recorder))
                .service(web::scope("/i").service(track_routes())),
        )
        .await
    }};
}

fn location_of(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get("Location")
        .expect("Missing Location header")
        .to_str()
        .expect("Location is not valid UTF-8")
}

fn attribution_cookie(
    resp: &actix_web::dev::ServiceResponse,
) -> Option<actix_web::cookie::Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "ot_attribution")
        .map(|c| c.into_owned())
}

// =============================================================================
// Hit route tests
// =============================================================================

#[tokio::test]
async fn test_hit_unknown_code_redirects_to_default() {
    init_test_env().await;
    let app = track_app!();

    let req = TestRequest::get().uri("/i/zzzzzzz/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "/");
    assert!(attribution_cookie(&resp).is_none());
}

#[tokio::test]
async fn test_hit_malformed_code_redirects_to_default() {
    init_test_env().await;
    let app = track_app!();

    // Too long and wrong case both fail the shape check before any lookup
    for uri in ["/i/waytoolongcode/", "/i/UPPER12/"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "uri: {}", uri);
        assert_eq!(location_of(&resp), "/", "uri: {}", uri);
        assert!(attribution_cookie(&resp).is_none(), "uri: {}", uri);
    }
}

#[tokio::test]
async fn test_hit_tracked_origin_sets_cookie_and_redirects() {
    init_test_env().await;
    seed_origin(
        "hit1111",
        true,
        Some("pid\noid"),
        Some("https://example.com/landing"),
    )
    .await;
    let app = track_app!();

    let req = TestRequest::get()
        .uri("/i/hit1111/?pid=7&oid=9")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "https://example.com/landing");

    let cookie = attribution_cookie(&resp).expect("Attribution cookie missing");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    // The cookie value carries the full hit context
    let token = AttributionToken::decode(cookie.value()).expect("Cookie value should decode");
    assert_eq!(token.code, "hit1111");
    assert_eq!(token.params.get("pid"), Some(&"7".to_string()));
    assert_eq!(token.params.get("oid"), Some(&"9".to_string()));
}

#[tokio::test]
async fn test_hit_captures_untracked_parameters_too() {
    init_test_env().await;
    seed_origin("hit2222", true, Some("pid"), None).await;
    let app = track_app!();

    // The token stores everything; narrowing happens at registration time
    let req = TestRequest::get()
        .uri("/i/hit2222/?pid=7&zid=1")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let cookie = attribution_cookie(&resp).expect("Attribution cookie missing");
    let token = AttributionToken::decode(cookie.value()).expect("Cookie value should decode");
    assert_eq!(token.params.len(), 2);
    assert_eq!(token.params.get("zid"), Some(&"1".to_string()));
}

#[tokio::test]
async fn test_hit_without_redirect_target_uses_default() {
    init_test_env().await;
    seed_origin("hit3333", true, None, None).await;
    let app = track_app!();

    let req = TestRequest::get().uri("/i/hit3333/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "/");
    assert!(attribution_cookie(&resp).is_some());
}

#[tokio::test]
async fn test_hit_untracked_origin_redirects_without_cookie() {
    init_test_env().await;
    seed_origin(
        "hit4444",
        false,
        None,
        Some("https://example.com/untracked"),
    )
    .await;
    let app = track_app!();

    let req = TestRequest::get().uri("/i/hit4444/?pid=7").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "https://example.com/untracked");
    assert!(attribution_cookie(&resp).is_none());
}

#[tokio::test]
async fn test_hit_head_request_and_no_trailing_slash() {
    init_test_env().await;
    seed_origin("hit5555", true, None, Some("https://example.com/head")).await;
    let app = track_app!();

    let req = TestRequest::default()
        .method(actix_web::http::Method::HEAD)
        .uri("/i/hit5555/")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = TestRequest::get().uri("/i/hit5555").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location_of(&resp), "https://example.com/head");
}

// =============================================================================
// Registration hook tests
// =============================================================================

#[tokio::test]
async fn test_register_without_token() {
    init_test_env().await;
    let app = track_app!();

    let req = TestRequest::post()
        .uri("/i/register/")
        .set_json(json!({ "user_id": "hookless-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    // A consumed or absent token always leaves an expired cookie behind
    let cookie = attribution_cookie(&resp).expect("Expired cookie missing");
    assert_eq!(cookie.value(), "");

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.expect("Missing data")["outcome"], "no_token");
}

#[tokio::test]
async fn test_register_full_attribution_flow() {
    init_test_env().await;
    seed_origin("flow111", true, Some("pid\noid"), None).await;
    let app = track_app!();

    // Visitor hits the tracked origin with extra parameters in tow
    let req = TestRequest::get()
        .uri("/i/flow111/?pid=7&oid=9&zid=1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = attribution_cookie(&resp).expect("Attribution cookie missing");

    // The user registers with the pending token
    let req = TestRequest::post()
        .uri("/i/register/")
        .cookie(cookie.clone())
        .set_json(json!({ "user_id": "flow-user-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.expect("Missing data")["outcome"], "recorded");

    // Counters: one registration, one row per tracked parameter, zid ignored
    let storage = get_storage();
    let origin = storage
        .get_origin("flow111")
        .await
        .expect("Query failed")
        .expect("Origin missing");
    assert_eq!(origin.number_of_registrations, 1);

    let counters = storage.list_parameters("flow111").await.expect("Query failed");
    assert_eq!(counters.len(), 2);
    let pairs: Vec<(String, String)> = counters
        .iter()
        .map(|c| (c.identifier.clone(), c.value.clone()))
        .collect();
    assert!(pairs.contains(&("pid".to_string(), "7".to_string())));
    assert!(pairs.contains(&("oid".to_string(), "9".to_string())));

    // Replaying the same token for the same user changes nothing
    let req = TestRequest::post()
        .uri("/i/register/")
        .cookie(cookie)
        .set_json(json!({ "user_id": "flow-user-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(
        body.data.expect("Missing data")["outcome"],
        "already_registered"
    );

    let origin = storage
        .get_origin("flow111")
        .await
        .expect("Query failed")
        .expect("Origin missing");
    assert_eq!(origin.number_of_registrations, 1);
}

#[tokio::test]
async fn test_register_empty_user_id_rejected() {
    init_test_env().await;
    let app = track_app!();

    for user_id in ["", "   "] {
        let req = TestRequest::post()
            .uri("/i/register/")
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // A rejected call makes no recording attempt, so no cookie is cleared
        assert!(attribution_cookie(&resp).is_none());
    }
}

#[tokio::test]
async fn test_register_invalid_json_rejected() {
    init_test_env().await;
    let app = track_app!();

    let req = TestRequest::post()
        .uri("/i/register/")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("not json at all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_token_for_unknown_origin() {
    init_test_env().await;
    let app = track_app!();

    // A token whose origin was deleted after the hit
    let token = AttributionToken::new("zzzzzzz", HashMap::new());
    let cookie = TokenCookieBuilder::from_config()
        .build_token_cookie(&token)
        .expect("Failed to build cookie");

    let req = TestRequest::post()
        .uri("/i/register/")
        .cookie(cookie)
        .set_json(json!({ "user_id": "orphan-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.code, 0);
    assert_eq!(
        body.data.expect("Missing data")["outcome"],
        "origin_unknown"
    );
}

#[tokio::test]
async fn test_register_token_for_untracked_origin() {
    init_test_env().await;
    seed_origin("notrack", false, None, None).await;
    let app = track_app!();

    // Tracking was switched off between the hit and the registration
    let token = AttributionToken::new("notrack", HashMap::new());
    let cookie = TokenCookieBuilder::from_config()
        .build_token_cookie(&token)
        .expect("Failed to build cookie");

    let req = TestRequest::post()
        .uri("/i/register/")
        .cookie(cookie)
        .set_json(json!({ "user_id": "untracked-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(
        body.data.expect("Missing data")["outcome"],
        "tracking_disabled"
    );

    let origin = get_storage()
        .get_origin("notrack")
        .await
        .expect("Query failed")
        .expect("Origin missing");
    assert_eq!(origin.number_of_registrations, 0);
}

#[tokio::test]
async fn test_register_garbage_cookie_reads_as_no_token() {
    init_test_env().await;
    let app = track_app!();

    let req = TestRequest::post()
        .uri("/i/register/")
        .cookie(actix_web::cookie::Cookie::new("ot_attribution", "garbage"))
        .set_json(json!({ "user_id": "garbage-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.data.expect("Missing data")["outcome"], "no_token");
}

#[tokio::test]
async fn test_register_without_trailing_slash() {
    init_test_env().await;
    let app = track_app!();

    let req = TestRequest::post()
        .uri("/i/register")
        .set_json(json!({ "user_id": "slashless-user" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
