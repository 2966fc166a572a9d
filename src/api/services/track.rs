use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace, warn};

use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::services::{RecordOutcome, RegistrationService};
use crate::session::{AttributionToken, TokenCookieBuilder};
use crate::storage::TrackingStorage;
use crate::utils::is_well_formed_code;

/// Body of the authentication-success hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub user_id: String,
}

pub struct TrackService {}

impl TrackService {
    /// Hit route: resolve the code, leave a pending attribution token,
    /// redirect.
    ///
    /// The visitor never sees an error. Unknown codes and storage trouble
    /// degrade to a redirect to the configured default target.
    pub async fn handle_hit(
        req: HttpRequest,
        path: web::Path<String>,
        query: web::Query<HashMap<String, String>>,
        storage: web::Data<Arc<TrackingStorage>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let default_redirect = crate::config::get_config().tracking.default_redirect.clone();

        if !is_well_formed_code(&code) {
            // Malformed codes are indistinguishable from unknown ones
            trace!("Malformed origin code rejected: {}", code);
            return Self::redirect_response(&default_redirect);
        }

        let Some(origin) = storage.resolve_origin(&code).await else {
            debug!("Origin not found for hit: {}", code);
            return Self::redirect_response(&default_redirect);
        };

        let params = query.into_inner();
        let target = origin
            .redirect_to
            .clone()
            .unwrap_or_else(|| default_redirect.clone());

        // Every resolved hit is published, tracked or not
        crate::publish_origin_hit!(
            &origin.code,
            &origin.title,
            req.path(),
            params.clone(),
            &target,
            "track_service"
        );

        if !origin.track_registrations {
            trace!("Hit on untracked origin: {}", origin.code);
            return Self::redirect_response(&target);
        }

        let token = AttributionToken::new(origin.code.clone(), params);
        let mut response = HttpResponse::build(StatusCode::FOUND);
        response.insert_header(("Location", target.as_str()));

        match TokenCookieBuilder::from_config().build_token_cookie(&token) {
            Ok(cookie) => {
                response.cookie(cookie);
            }
            Err(e) => {
                // Oversized token: the redirect still happens, attribution is lost
                warn!("Skipping attribution cookie for '{}': {}", origin.code, e);
            }
        }

        response.finish()
    }

    /// Authentication-success hook: consume the pending token and attribute
    /// the registration.
    ///
    /// The response always clears the cookie, and reports what the attempt
    /// amounted to without ever failing the caller's signup flow.
    pub async fn handle_register(
        req: HttpRequest,
        payload: web::Json<RegisterPayload>,
        recorder: web::Data<Arc<RegistrationService>>,
    ) -> impl Responder {
        let user_id = payload.user_id.trim().to_string();

        if user_id.is_empty() {
            debug!("Registration hook called with empty user_id");
            return HttpResponse::BadRequest()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::BadRequest as i32,
                    message: "user_id cannot be empty".to_string(),
                    data: None,
                });
        }

        let cookie_builder = TokenCookieBuilder::from_config();
        let token = cookie_builder.read_token(&req);

        let (code, message, outcome) = match recorder.record(token, &user_id).await {
            Ok(outcome) => (ErrorCode::Success, "OK".to_string(), outcome_label(outcome)),
            Err(e) => {
                error!("Registration recording failed for user {}: {}", user_id, e);
                (
                    ErrorCode::ServiceUnavailable,
                    "registration recording failed".to_string(),
                    "error",
                )
            }
        };

        HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .cookie(cookie_builder.build_expired_token_cookie())
            .json(ApiResponse {
                code: code as i32,
                message,
                data: Some(serde_json::json!({ "outcome": outcome })),
            })
    }

    #[inline]
    fn redirect_response(target: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", target))
            .finish()
    }
}

fn outcome_label(outcome: RecordOutcome) -> &'static str {
    match outcome {
        RecordOutcome::NoToken => "no_token",
        RecordOutcome::OriginUnknown => "origin_unknown",
        RecordOutcome::TrackingDisabled => "tracking_disabled",
        RecordOutcome::AlreadyRegistered => "already_registered",
        RecordOutcome::Recorded => "recorded",
    }
}

/// Tracking route configuration
///
/// The caller mounts this under the configured tracking prefix. The
/// register hook is listed first so it never parses as an origin code.
pub fn track_routes() -> actix_web::Scope {
    web::scope("")
        .route("/register/", web::post().to(TrackService::handle_register))
        .route("/register", web::post().to(TrackService::handle_register))
        .route("/{code}/", web::get().to(TrackService::handle_hit))
        .route("/{code}/", web::head().to(TrackService::handle_hit))
        .route("/{code}", web::get().to(TrackService::handle_hit))
        .route("/{code}", web::head().to(TrackService::handle_hit))
}
